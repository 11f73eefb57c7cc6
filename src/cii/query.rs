//! Path queries over an [`XmlDocument`](super::XmlDocument) and the typed
//! accessors the extractor is written against.
//!
//! A query is evaluated relative to the node it is called on: the first step
//! must name that node itself, the following steps descend into children.
//!
//! ```text
//! query := "string(" path ")" | path
//! path  := ("/" step)+ [ "/text()" | "/@" attribute ]
//! step  := [prefix ":"] local-name
//! ```
//!
//! `/text()` reads the element's own character data, `/@attr` an attribute,
//! and a bare element path its string-value (all descendant text). Values
//! are trimmed; an empty value counts as absent.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::str::FromStr;

use super::cii_ns;
use super::tree::XmlNode;
use crate::core::ExtractionError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum StepNamespace {
    None,
    Uri(&'static str),
    /// Prefix not bound to a CII namespace; matches nothing.
    Unknown,
}

#[derive(Debug, Clone)]
struct Step {
    namespace: StepNamespace,
    local: String,
    display: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Element,
    Text,
    Attribute(String),
}

/// A parsed query expression.
#[derive(Debug, Clone)]
pub(crate) struct Query {
    steps: Vec<Step>,
    target: Target,
}

fn resolve_prefix(prefix: &str) -> StepNamespace {
    match prefix {
        "rsm" => StepNamespace::Uri(cii_ns::RSM),
        "ram" => StepNamespace::Uri(cii_ns::RAM),
        "udt" => StepNamespace::Uri(cii_ns::UDT),
        "qdt" => StepNamespace::Uri(cii_ns::QDT),
        _ => StepNamespace::Unknown,
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl Step {
    fn parse(segment: &str, expr: &str) -> Result<Self, ExtractionError> {
        let (namespace, local) = match segment.split_once(':') {
            Some((prefix, local)) if is_name(prefix) => (resolve_prefix(prefix), local),
            Some(_) => return Err(ExtractionError::Query(expr.to_string())),
            None => (StepNamespace::None, segment),
        };
        if !is_name(local) {
            return Err(ExtractionError::Query(expr.to_string()));
        }
        Ok(Self {
            namespace,
            local: local.to_string(),
            display: segment.to_string(),
        })
    }

    fn matches(&self, node: &XmlNode<'_>) -> bool {
        if node.local_name() != self.local {
            return false;
        }
        match self.namespace {
            StepNamespace::None => node.namespace().is_none(),
            StepNamespace::Uri(uri) => node.namespace() == Some(uri),
            StepNamespace::Unknown => false,
        }
    }
}

impl Query {
    pub(crate) fn parse(expr: &str) -> Result<Self, ExtractionError> {
        let invalid = || ExtractionError::Query(expr.to_string());

        let path = match expr.strip_prefix("string(") {
            Some(inner) => inner.strip_suffix(')').ok_or_else(invalid)?,
            None => expr,
        };
        let path = path.strip_prefix('/').ok_or_else(invalid)?;

        let segments: Vec<&str> = path.split('/').collect();
        let mut steps = Vec::with_capacity(segments.len());
        let mut target = Target::Element;

        for (i, segment) in segments.iter().enumerate() {
            let last = i + 1 == segments.len();
            if *segment == "text()" {
                if !last || steps.is_empty() {
                    return Err(invalid());
                }
                target = Target::Text;
            } else if let Some(attr) = segment.strip_prefix('@') {
                if !last || steps.is_empty() || !is_name(attr) {
                    return Err(invalid());
                }
                target = Target::Attribute(attr.to_string());
            } else {
                steps.push(Step::parse(segment, expr)?);
            }
        }

        if steps.is_empty() {
            return Err(invalid());
        }
        Ok(Self { steps, target })
    }

    /// Elements reached by the path steps, in document order.
    fn select<'a>(&self, context: XmlNode<'a>) -> Vec<XmlNode<'a>> {
        let Some((first, rest)) = self.steps.split_first() else {
            return Vec::new();
        };
        if !first.matches(&context) {
            return Vec::new();
        }

        let mut current = vec![context];
        for step in rest {
            current = current
                .iter()
                .flat_map(|node| node.children().filter(|child| step.matches(child)))
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }

    /// First non-empty value, trimmed.
    fn first_value<'a>(&self, context: XmlNode<'a>) -> Option<Cow<'a, str>> {
        self.select(context).into_iter().find_map(|node| {
            let value = match &self.target {
                Target::Text => Cow::Borrowed(node.content().trim()),
                Target::Attribute(name) => Cow::Borrowed(node.attribute(name)?.trim()),
                Target::Element => Cow::Owned(node.string_value().trim().to_string()),
            };
            (!value.is_empty()).then_some(value)
        })
    }

    /// Absolute location of this query evaluated at `context`, for error reports.
    fn locate(&self, context: XmlNode<'_>) -> String {
        let mut out = context.location();
        for step in self.steps.iter().skip(1) {
            out.push('/');
            out.push_str(&step.display);
        }
        match &self.target {
            Target::Element => {}
            Target::Text => out.push_str("/text()"),
            Target::Attribute(name) => {
                out.push_str("/@");
                out.push_str(name);
            }
        }
        out
    }
}

fn parse_cii_date(path: impl FnOnce() -> String, value: &str) -> Result<NaiveDate, ExtractionError> {
    let malformed = || ExtractionError::MalformedDate {
        path: path(),
        value: value.to_string(),
    };
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let year = value[0..4].parse::<i32>().ok();
    let month = value[4..6].parse::<u32>().ok();
    let day = value[6..8].parse::<u32>().ok();
    match (year, month, day) {
        (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d).ok_or_else(malformed),
        _ => Err(malformed()),
    }
}

/// `xs:decimal` lexical form: optional sign, digits, optional fraction,
/// at least one digit overall.
fn is_xs_decimal(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    digits(int) && digits(frac) && !(int.is_empty() && frac.is_empty())
}

fn parse_decimal(path: impl FnOnce() -> String, value: &str) -> Result<Decimal, ExtractionError> {
    let invalid = || ExtractionError::InvalidDecimal {
        path: path(),
        value: value.to_string(),
    };
    if !is_xs_decimal(value) {
        return Err(invalid());
    }
    Decimal::from_str(value.strip_prefix('+').unwrap_or(value)).map_err(|_| invalid())
}

/// Typed accessors. Every `required_*` variant fails with
/// [`ExtractionError::MissingRequiredField`] naming the absolute path.
impl<'a> XmlNode<'a> {
    fn value(&self, expr: &str) -> Result<Option<Cow<'a, str>>, ExtractionError> {
        Ok(Query::parse(expr)?.first_value(*self))
    }

    fn required_value(&self, expr: &str) -> Result<Cow<'a, str>, ExtractionError> {
        let query = Query::parse(expr)?;
        query
            .first_value(*self)
            .ok_or_else(|| ExtractionError::missing(query.locate(*self)))
    }

    /// Absolute location of `expr` evaluated at this node.
    pub fn locate(&self, expr: &str) -> Result<String, ExtractionError> {
        Ok(Query::parse(expr)?.locate(*self))
    }

    pub fn text(&self, expr: &str) -> Result<Option<String>, ExtractionError> {
        Ok(self.value(expr)?.map(Cow::into_owned))
    }

    pub fn required_text(&self, expr: &str) -> Result<String, ExtractionError> {
        self.required_value(expr).map(Cow::into_owned)
    }

    /// A controlled code value; behaves like [`text`](Self::text).
    pub fn code(&self, expr: &str) -> Result<Option<String>, ExtractionError> {
        self.text(expr)
    }

    pub fn required_code(&self, expr: &str) -> Result<String, ExtractionError> {
        self.required_text(expr)
    }

    /// A business identifier; behaves like [`text`](Self::text).
    pub fn identifier(&self, expr: &str) -> Result<Option<String>, ExtractionError> {
        self.text(expr)
    }

    pub fn required_identifier(&self, expr: &str) -> Result<String, ExtractionError> {
        self.required_text(expr)
    }

    /// A `YYYYMMDD` date (UNTDID 2379 format 102).
    pub fn date(&self, expr: &str) -> Result<Option<NaiveDate>, ExtractionError> {
        let query = Query::parse(expr)?;
        query
            .first_value(*self)
            .map(|v| parse_cii_date(|| query.locate(*self), &v))
            .transpose()
    }

    pub fn required_date(&self, expr: &str) -> Result<NaiveDate, ExtractionError> {
        let value = self.required_value(expr)?;
        parse_cii_date(|| self.locate(expr).unwrap_or_else(|_| expr.to_string()), &value)
    }

    pub fn decimal(&self, expr: &str) -> Result<Option<Decimal>, ExtractionError> {
        let query = Query::parse(expr)?;
        query
            .first_value(*self)
            .map(|v| parse_decimal(|| query.locate(*self), &v))
            .transpose()
    }

    pub fn required_decimal(&self, expr: &str) -> Result<Decimal, ExtractionError> {
        let value = self.required_value(expr)?;
        parse_decimal(|| self.locate(expr).unwrap_or_else(|_| expr.to_string()), &value)
    }

    /// All elements matching `expr`, in document order.
    pub fn nodes(&self, expr: &str) -> Result<Vec<XmlNode<'a>>, ExtractionError> {
        Ok(Query::parse(expr)?.select(*self))
    }

    /// First element matching `expr`.
    pub fn first_node(&self, expr: &str) -> Result<Option<XmlNode<'a>>, ExtractionError> {
        Ok(self.nodes(expr)?.into_iter().next())
    }
}
