use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};

use crate::core::ExtractionError;

/// A parsed XML document.
///
/// Elements live in a flat arena in document order; [`XmlNode`] is a cheap
/// handle into it. Element names are kept with their resolved namespace so
/// queries are independent of the prefixes a producer chose.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    elements: Vec<Element>,
}

#[derive(Debug, Clone)]
struct Element {
    /// Qualified name as written in the source.
    name: String,
    local: String,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    text: String,
    /// Direct text chunks, each tagged with the number of child elements
    /// preceding it.
    runs: Vec<(usize, String)>,
    parent: Option<usize>,
    children: Vec<usize>,
}

fn xml_err(e: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::Xml(e.to_string())
}

impl XmlDocument {
    /// Parse UTF-8 XML bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self, ExtractionError> {
        let mut reader = NsReader::from_reader(bytes);
        let mut elements: Vec<Element> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        loop {
            let (ns, event) = reader.read_resolved_event().map_err(xml_err)?;
            let namespace = match ns {
                ResolveResult::Bound(Namespace(uri)) => {
                    Some(String::from_utf8_lossy(uri).into_owned())
                }
                _ => None,
            };

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let parent = stack.last().copied();
                    if parent.is_none() && !elements.is_empty() {
                        return Err(ExtractionError::Xml("multiple root elements".into()));
                    }
                    let idx = elements.len();
                    elements.push(Element::from_start(e, namespace, parent)?);
                    if let Some(p) = parent {
                        elements[p].children.push(idx);
                    }
                    if matches!(event, Event::Start(_)) {
                        stack.push(idx);
                    }
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(ref t) => {
                    if let Some(&current) = stack.last() {
                        let text = t.unescape().map_err(xml_err)?;
                        elements[current].push_text(&text);
                    }
                }
                Event::CData(c) => {
                    if let Some(&current) = stack.last() {
                        let data = c.into_inner();
                        elements[current].push_text(&String::from_utf8_lossy(&data));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(ExtractionError::Xml("unexpected end of document".into()));
        }
        if elements.is_empty() {
            return Err(ExtractionError::Xml("document has no root element".into()));
        }

        Ok(Self { elements })
    }

    /// The document element.
    pub fn root(&self) -> XmlNode<'_> {
        XmlNode { doc: self, idx: 0 }
    }

    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Element {
    fn from_start(
        e: &BytesStart<'_>,
        namespace: Option<String>,
        parent: Option<usize>,
    ) -> Result<Self, ExtractionError> {
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(xml_err)?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let local = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(xml_err)?.into_owned();
            attributes.push((local, value));
        }

        Ok(Self {
            name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            local: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
            namespace,
            attributes,
            text: String::new(),
            runs: Vec::new(),
            parent,
            children: Vec::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
        let position = self.children.len();
        match self.runs.last_mut() {
            Some((at, run)) if *at == position => run.push_str(text),
            _ => self.runs.push((position, text.to_string())),
        }
    }
}

/// Handle to one element of an [`XmlDocument`].
#[derive(Clone, Copy)]
pub struct XmlNode<'a> {
    doc: &'a XmlDocument,
    idx: usize,
}

impl<'a> XmlNode<'a> {
    fn element(&self) -> &'a Element {
        &self.doc.elements[self.idx]
    }

    /// Qualified name as written in the document (e.g. `ram:Name`).
    pub fn name(&self) -> &'a str {
        &self.element().name
    }

    pub fn local_name(&self) -> &'a str {
        &self.element().local
    }

    /// Resolved namespace URI, if the element is in a namespace.
    pub fn namespace(&self) -> Option<&'a str> {
        self.element().namespace.as_deref()
    }

    /// Direct character data of this element, untrimmed.
    pub fn content(&self) -> &'a str {
        &self.element().text
    }

    /// XPath string-value: the character data of this element and all of
    /// its descendants, in document order, untrimmed.
    pub fn string_value(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(*self, 0usize)];
        while let Some((node, next)) = stack.pop() {
            let element = node.element();
            for (_, run) in element.runs.iter().filter(|(at, _)| *at == next) {
                out.push_str(run);
            }
            if let Some(&child) = element.children.get(next) {
                stack.push((node, next + 1));
                stack.push((XmlNode { doc: node.doc, idx: child }, 0));
            }
        }
        out
    }

    /// Attribute value by local name.
    pub fn attribute(&self, local: &str) -> Option<&'a str> {
        self.element()
            .attributes
            .iter()
            .find(|(k, _)| k == local)
            .map(|(_, v)| v.as_str())
    }

    pub fn parent(&self) -> Option<XmlNode<'a>> {
        self.element().parent.map(|idx| XmlNode { doc: self.doc, idx })
    }

    /// Child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = XmlNode<'a>> + 'a {
        let doc = self.doc;
        self.element()
            .children
            .iter()
            .map(move |&idx| XmlNode { doc, idx })
    }

    fn same_name(&self, other: &XmlNode<'_>) -> bool {
        self.local_name() == other.local_name() && self.namespace() == other.namespace()
    }

    /// Absolute location of this element, e.g.
    /// `/rsm:CrossIndustryInvoice/rsm:SupplyChainTradeTransaction/ram:IncludedSupplyChainTradeLineItem[2]`.
    ///
    /// A 1-based position is appended only when same-named siblings exist.
    pub fn location(&self) -> String {
        let mut segments = Vec::new();
        let mut current = Some(*self);
        while let Some(node) = current {
            let parent = node.parent();
            let segment = match parent {
                Some(p) => {
                    let mut position = 0;
                    let mut total = 0;
                    for sibling in p.children().filter(|s| s.same_name(&node)) {
                        total += 1;
                        if sibling.idx == node.idx {
                            position = total;
                        }
                    }
                    if total > 1 {
                        format!("{}[{position}]", node.name())
                    } else {
                        node.name().to_string()
                    }
                }
                None => node.name().to_string(),
            };
            segments.push(segment);
            current = parent;
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }
}

impl std::fmt::Debug for XmlNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlNode")
            .field("location", &self.location())
            .finish()
    }
}
