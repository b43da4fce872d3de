//! Minimal element tree over quick-xml events.
//!
//! Element names are stored by local name, so `<nfe:dest>`, `<dest>` under
//! a default namespace and a bare `<dest>` all resolve the same way.

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::NfeError;

/// One XML element with its attributes, text and children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>, decoder: Decoder) -> Result<Self, NfeError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.decode_and_unescape_value(decoder)?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            ..Default::default()
        })
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First descendant (depth-first, excluding `self`) with the given local name.
    pub fn descendant(&self, name: &str) -> Option<&Element> {
        self.children
            .iter()
            .find_map(|c| if c.name == name { Some(c) } else { c.descendant(name) })
    }

    /// Trimmed text of a direct child, if present and non-empty.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.text.trim())
            .filter(|t| !t.is_empty())
    }

    /// Attribute value by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse a document into its root element.
pub fn parse_document(xml: &str) -> Result<Element, NfeError> {
    build_tree(Reader::from_str(xml))
}

/// Parse raw document bytes, decoding them with the encoding named in the
/// XML declaration (UTF-8 when absent).
pub fn parse_document_bytes(xml: &[u8]) -> Result<Element, NfeError> {
    build_tree(Reader::from_reader(xml))
}

fn build_tree(mut reader: Reader<&[u8]>) -> Result<Element, NfeError> {
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => stack.push(Element::from_start(e, reader.decoder())?),
            Event::Empty(ref e) => {
                let element = Element::from_start(e, reader.decoder())?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(ref e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(ref e) => {
                if let Some(current) = stack.last_mut() {
                    let text = reader.decoder().decode(e).map_err(quick_xml::Error::from)?;
                    current.text.push_str(&text);
                }
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(NfeError::Unclosed(open.name));
    }
    root.ok_or(NfeError::NoRoot)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_local_names_ignore_prefixes() {
        let xml = r#"<?xml version="1.0"?>
<nfe:nfeProc xmlns:nfe="http://www.portalfiscal.inf.br/nfe">
  <nfe:NFe><nfe:infNFe Id="NFe123"><nfe:ide><nfe:nNF> 0042 </nfe:nNF></nfe:ide></nfe:infNFe></nfe:NFe>
</nfe:nfeProc>"#;

        let root = parse_document(xml).unwrap();
        assert_eq!(root.name, "nfeProc");
        let inf = root.descendant("infNFe").unwrap();
        assert_eq!(inf.attribute("Id"), Some("NFe123"));
        assert_eq!(inf.child("ide").and_then(|i| i.child_text("nNF")), Some("0042"));
    }

    #[test]
    fn test_text_is_unescaped() {
        let root = parse_document("<a><b>A &amp; B</b><c/><d><![CDATA[x<y]]></d></a>").unwrap();
        assert_eq!(root.child_text("b"), Some("A & B"));
        assert_eq!(root.child_text("c"), None);
        assert_eq!(root.child_text("d"), Some("x<y"));
        assert_eq!(root.children_named("b").count(), 1);
    }

    #[test]
    fn test_declared_latin1_encoding() {
        let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<dest xNome=\"S\xe3o\"><xNome>Com\xe9rcio Ltda</xNome></dest>";

        let root = parse_document_bytes(xml).unwrap();
        assert_eq!(root.child_text("xNome"), Some("Comércio Ltda"));
        assert_eq!(root.attribute("xNome"), Some("São"));

        let utf8 = parse_document_bytes("<a><b>Comércio</b></a>".as_bytes()).unwrap();
        assert_eq!(utf8.child_text("b"), Some("Comércio"));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(parse_document("<a><b></a>").is_err());
        assert!(parse_document("<a><b>").is_err());
        assert!(matches!(parse_document(""), Err(NfeError::NoRoot)));
    }
}
