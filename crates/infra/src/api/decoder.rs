//! Response decoding
//!
//! Every response is first parsed into an owned [`XmlDocument`]. An `error`
//! root short-circuits into [`ApiError::RemoteApi`]; otherwise the requested
//! [`ResponseShape`] turns the tree into its output type.

use std::fmt::Write as _;
use std::marker::PhantomData;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::de::DeserializeOwned;
use vknet_domain::constants::{ERROR_ELEMENT, LIST_COUNT_ELEMENT, RESPONSE_ELEMENT};
use vknet_domain::{ErrorResponse, ListDocument, ResponseElement};

use super::errors::ApiError;

/// Element node of a parsed response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Concatenated, unescaped text directly inside this element.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// First direct child named `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    fn is_blank(&self) -> bool {
        self.text.is_empty() && self.children.is_empty() && self.attributes.is_empty()
    }

    /// Serialize back to XML, every element included.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out, false);
        out
    }

    /// XML handed to serde. Blank child elements are left out so the
    /// corresponding fields fall back to their defaults instead of failing
    /// numeric parsing.
    fn to_serde_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out, true);
        out
    }

    fn write_xml(&self, out: &mut String, skip_blank: bool) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            let _ = write!(out, " {key}=\"{}\"", escape(value.as_str()));
        }
        out.push('>');
        out.push_str(&escape(self.text.as_str()));
        for child in self.children.iter().filter(|c| !(skip_blank && c.is_blank())) {
            child.write_xml(out, skip_blank);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, ApiError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ApiError::Decode(format!("malformed attribute: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| ApiError::Decode(format!("malformed attribute value: {e}")))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self { name, attributes, text: String::new(), children: Vec::new() })
    }
}

/// Parsed response document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Parse raw XML into an owned tree.
    ///
    /// # Errors
    /// [`ApiError::Decode`] for malformed XML, unclosed elements, or a
    /// document without exactly one root element.
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let mut reader = Reader::from_str(raw);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => stack.push(XmlElement::from_start(&start)?),
                Ok(Event::Empty(start)) => {
                    attach(&mut stack, &mut root, XmlElement::from_start(&start)?)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| ApiError::Decode("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(text)) => {
                    let text = text
                        .unescape()
                        .map_err(|e| ApiError::Decode(format!("malformed text: {e}")))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(data)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(ApiError::Decode(format!(
                        "malformed XML at byte {}: {e}",
                        reader.buffer_position()
                    )));
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(ApiError::Decode(format!("unclosed element <{}>", open.name)));
        }

        root.map(|root| Self { root })
            .ok_or_else(|| ApiError::Decode("response has no root element".to_string()))
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), ApiError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(ApiError::Decode("multiple root elements".to_string())),
    }
    Ok(())
}

fn deserialize<T: DeserializeOwned + ResponseElement>(element: &XmlElement) -> Result<T, ApiError> {
    if element.name != T::ELEMENT {
        return Err(ApiError::Decode(format!(
            "expected <{}>, found <{}>",
            T::ELEMENT,
            element.name
        )));
    }

    quick_xml::de::from_str(&element.to_serde_xml()).map_err(|e| {
        ApiError::Decode(format!(
            "cannot read <{}> as {}: {e}",
            element.name,
            std::any::type_name::<T>()
        ))
    })
}

mod sealed {
    pub trait Sealed {}
}

/// How a response document is turned into a typed result
///
/// Implemented only by the marker types in this module.
pub trait ResponseShape: sealed::Sealed {
    type Output;

    #[doc(hidden)]
    fn extract(document: XmlDocument) -> Result<Self::Output, ApiError>;
}

/// The parsed tree, unchanged.
#[derive(Debug)]
pub struct RawDocument;

/// Every direct child of the root read as an integer, in document order.
#[derive(Debug)]
pub struct IntegerList;

/// A single object: a `response` root is unwrapped to its first child
/// element before deserializing into `T`. The element must be named
/// `T::ELEMENT`.
#[derive(Debug)]
pub struct SingleObject<T>(PhantomData<T>);

/// The root element deserialized directly into a list-wrapper type `T`.
///
/// The root must be named `T::ELEMENT` and hold nothing but the count
/// element and item elements.
#[derive(Debug)]
pub struct ListWrapper<T>(PhantomData<T>);

impl sealed::Sealed for RawDocument {}
impl sealed::Sealed for IntegerList {}
impl<T> sealed::Sealed for SingleObject<T> {}
impl<T> sealed::Sealed for ListWrapper<T> {}

impl ResponseShape for RawDocument {
    type Output = XmlDocument;

    fn extract(document: XmlDocument) -> Result<Self::Output, ApiError> {
        Ok(document)
    }
}

impl ResponseShape for IntegerList {
    type Output = Vec<i64>;

    fn extract(document: XmlDocument) -> Result<Self::Output, ApiError> {
        document
            .root
            .children
            .iter()
            .map(|child| {
                child.text.trim().parse::<i64>().map_err(|e| {
                    ApiError::Decode(format!("<{}> is not an integer ({:?}): {e}", child.name, child.text))
                })
            })
            .collect()
    }
}

impl<T: DeserializeOwned + ResponseElement> ResponseShape for SingleObject<T> {
    type Output = T;

    fn extract(document: XmlDocument) -> Result<Self::Output, ApiError> {
        let root = document.root;
        if root.name == RESPONSE_ELEMENT {
            let first = root
                .children
                .first()
                .ok_or_else(|| ApiError::Decode("<response> has no child element".to_string()))?;
            deserialize(first)
        } else {
            deserialize(&root)
        }
    }
}

impl<T> ResponseShape for ListWrapper<T>
where
    T: DeserializeOwned + ResponseElement + ListDocument,
{
    type Output = T;

    fn extract(document: XmlDocument) -> Result<Self::Output, ApiError> {
        let item = <T::Item as ResponseElement>::ELEMENT;
        let stray = document
            .root
            .children
            .iter()
            .find(|child| child.name != LIST_COUNT_ELEMENT && child.name != item);
        if let Some(stray) = stray {
            return Err(ApiError::Decode(format!(
                "unexpected <{}> in a list of <{item}>",
                stray.name
            )));
        }

        deserialize(&document.root)
    }
}

/// Turns raw response text into a shaped result
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseDecoder;

impl ResponseDecoder {
    /// Decode `raw` into the output of shape `S`.
    ///
    /// # Errors
    /// - [`ApiError::RemoteApi`] for an `error` document
    /// - [`ApiError::UnknownRemote`] for an `error` document that cannot be read
    /// - [`ApiError::Decode`] for malformed XML or a shape mismatch
    pub fn decode<S: ResponseShape>(raw: &str) -> Result<S::Output, ApiError> {
        let document = XmlDocument::parse(raw)?;

        if document.root.name == ERROR_ELEMENT {
            return Err(match deserialize::<ErrorResponse>(&document.root) {
                Ok(error) => ApiError::RemoteApi { code: error.error_code, message: error.error_msg },
                Err(_) => ApiError::UnknownRemote { raw: raw.to_string() },
            });
        }

        S::extract(document)
    }
}
