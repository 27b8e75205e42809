//! WSDL reader.
//!
//! This module parses a WSDL 1.1 document with an embedded XML Schema into
//! type and operation descriptors. Only the subset used by SOAP interface
//! descriptions is understood: named complex types (optionally extending a
//! base), string enumerations, top-level elements, messages and port types.

use crate::error::ParseError;
use crate::types::{
    FieldDef, OperationDescriptor, Schema, TypeDescriptor, TypeRef, XSD_NAMESPACE,
    namespace_prefix,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Parses a WSDL document from a string.
///
/// # Arguments
/// * `xml` - WSDL document content
///
/// # Returns
/// Parsed schema or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed, a required attribute is
/// missing, or an operation references an undeclared message or element.
pub fn read(xml: &str) -> Result<Schema, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut doc = Document::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                doc.declare_namespaces(e)?;
                let name = local_name(e)?;
                match name.as_str() {
                    "definitions" | "schema" => doc.set_target_namespace(e)?,
                    "complexType" => {
                        let type_name = required_attr(e, "complexType", "name")?;
                        let composite = parse_complex_type(&mut reader, &doc, type_name)?;
                        doc.types.push(composite);
                    }
                    "simpleType" => {
                        if let Some(enum_def) = parse_simple_type(&mut reader, e)? {
                            doc.types.push(enum_def);
                        }
                    }
                    "element" => parse_element(&mut reader, e, &mut doc)?,
                    "message" => parse_message(&mut reader, e, &mut doc)?,
                    "portType" => parse_port_type(&mut reader, &mut doc)?,
                    "binding" | "service" => skip_to_end(&mut reader)?,
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = local_name(e)?;
                match name.as_str() {
                    "complexType" => {
                        let type_name = required_attr(e, "complexType", "name")?;
                        doc.types
                            .push(TypeDescriptor::new_composite(type_name, None, Vec::new()));
                    }
                    "element" => {
                        let element = required_attr(e, "element", "name")?;
                        let type_name = required_attr(e, "element", "type")?;
                        let type_ref = doc.resolve(&type_name);
                        doc.elements.insert(element, type_ref);
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    doc.finish()
}

/// Message part: either a schema element or a bare type.
#[derive(Debug, Clone)]
enum MessagePart {
    Element(String),
    Type(TypeRef),
}

/// Operation as declared in a port type, before message resolution.
#[derive(Debug, Clone)]
struct RawOperation {
    name: String,
    input: Option<String>,
    output: Option<String>,
}

/// Accumulated declarations while walking the document.
#[derive(Debug, Default)]
struct Document {
    target_namespace: Option<String>,
    /// Prefix to namespace (normalized via `namespace_prefix`).
    namespaces: HashMap<String, String>,
    types: Vec<TypeDescriptor>,
    elements: HashMap<String, TypeRef>,
    messages: HashMap<String, MessagePart>,
    operations: Vec<RawOperation>,
}

impl Document {
    fn declare_namespaces(&mut self, e: &BytesStart<'_>) -> Result<(), ParseError> {
        for attr in e.attributes().flatten() {
            let key = std::str::from_utf8(attr.key.as_ref())?;
            if let Some(prefix) = key.strip_prefix("xmlns:") {
                let value = std::str::from_utf8(&attr.value)?;
                self.namespaces
                    .insert(prefix.to_string(), namespace_prefix(value).to_string());
            }
        }
        Ok(())
    }

    fn set_target_namespace(&mut self, e: &BytesStart<'_>) -> Result<(), ParseError> {
        if let Some(ns) = attr(e, "targetNamespace")? {
            self.target_namespace = Some(ns);
        }
        Ok(())
    }

    fn own_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref().map(namespace_prefix)
    }

    /// Resolves a QName attribute value to a type reference.
    ///
    /// References into the document's own namespace become local.
    fn resolve(&self, qname: &str) -> TypeRef {
        let Some((prefix, name)) = qname.split_once(':') else {
            return TypeRef::local(qname);
        };

        let namespace = match self.namespaces.get(prefix) {
            Some(ns) => ns.as_str(),
            None if prefix == "xs" => XSD_NAMESPACE,
            None => prefix,
        };

        if Some(namespace) == self.own_namespace() {
            TypeRef::local(name)
        } else {
            TypeRef::qualified(namespace, name)
        }
    }

    fn finish(self) -> Result<Schema, ParseError> {
        let target_namespace = self.target_namespace.ok_or_else(|| {
            ParseError::InvalidStructure {
                message: "no targetNamespace declared".to_string(),
            }
        })?;

        let mut schema = Schema::new(target_namespace.clone());
        for type_def in self.types {
            schema.add_type(type_def);
        }

        for raw in self.operations {
            let input_message = raw
                .input
                .as_deref()
                .ok_or_else(|| ParseError::missing_attr("operation", "input"))?;
            let (request_element, input) =
                resolve_part(&self.messages, &self.elements, input_message, &raw.name)?;

            let mut operation =
                OperationDescriptor::new(raw.name.clone(), target_namespace.clone(), input, None);
            operation.request_element = request_element;

            if let Some(output_message) = raw.output.as_deref() {
                let (response_element, output) =
                    resolve_part(&self.messages, &self.elements, output_message, &raw.name)?;
                operation.response_element = response_element;
                operation.output = Some(output);
            }

            schema.add_operation(operation);
        }

        Ok(schema)
    }
}

/// Resolves a message name to its wire element name and payload type.
fn resolve_part(
    messages: &HashMap<String, MessagePart>,
    elements: &HashMap<String, TypeRef>,
    message: &str,
    operation: &str,
) -> Result<(String, TypeRef), ParseError> {
    let part = messages
        .get(message)
        .ok_or_else(|| ParseError::unresolved("message", message, operation))?;

    match part {
        MessagePart::Element(element) => {
            let type_ref = elements
                .get(element)
                .cloned()
                .ok_or_else(|| ParseError::unresolved("element", element, operation))?;
            Ok((element.clone(), type_ref))
        }
        MessagePart::Type(type_ref) => Ok((operation.to_string(), type_ref.clone())),
    }
}

/// Parses a complex type body. The opening tag has already been consumed.
fn parse_complex_type(
    reader: &mut Reader<&[u8]>,
    doc: &Document,
    name: String,
) -> Result<TypeDescriptor, ParseError> {
    let mut base = None;
    let mut fields = Vec::new();
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref child)) => {
                depth += 1;
                match local_name(child)?.as_str() {
                    "extension" => {
                        base = Some(doc.resolve(&required_attr(child, "extension", "base")?));
                    }
                    "element" => {
                        fields.push(parse_field(child, doc)?);
                        skip_to_end(reader)?;
                        depth -= 1;
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref child)) => match local_name(child)?.as_str() {
                "extension" => {
                    base = Some(doc.resolve(&required_attr(child, "extension", "base")?));
                }
                "element" => fields.push(parse_field(child, doc)?),
                _ => {}
            },
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => {
                return Err(ParseError::InvalidStructure {
                    message: format!("unexpected end of document inside complexType '{name}'"),
                });
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(TypeDescriptor::new_composite(name, base, fields))
}

/// Parses a sequence element into a field.
fn parse_field(e: &BytesStart<'_>, doc: &Document) -> Result<FieldDef, ParseError> {
    let mut name = None;
    let mut type_name = None;
    let mut optional = false;
    let mut repeated = false;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "name" => name = Some(value.to_string()),
            "type" => type_name = Some(value.to_string()),
            "minOccurs" => {
                let min: u32 = value
                    .parse()
                    .map_err(|_| ParseError::invalid_attr("element", "minOccurs", value))?;
                optional = min == 0;
            }
            "maxOccurs" => {
                repeated = match value {
                    "unbounded" => true,
                    _ => {
                        let max: u32 = value.parse().map_err(|_| {
                            ParseError::invalid_attr("element", "maxOccurs", value)
                        })?;
                        max > 1
                    }
                };
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("element", "name"))?;
    let type_name = type_name.ok_or_else(|| ParseError::missing_attr("element", "type"))?;

    let mut field = FieldDef::new(name, doc.resolve(&type_name));
    field.optional = optional;
    field.repeated = repeated;
    Ok(field)
}

/// Parses a simple type. Returns `None` for restrictions without
/// enumerations, which carry no symbolic values.
fn parse_simple_type(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<Option<TypeDescriptor>, ParseError> {
    let name = required_attr(e, "simpleType", "name")?;
    let mut values = Vec::new();
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref child)) => {
                depth += 1;
                if local_name(child)? == "enumeration" {
                    values.push(required_attr(child, "enumeration", "value")?);
                    skip_to_end(reader)?;
                    depth -= 1;
                }
            }
            Ok(Event::Empty(ref child)) => {
                if local_name(child)? == "enumeration" {
                    values.push(required_attr(child, "enumeration", "value")?);
                }
            }
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => {
                return Err(ParseError::InvalidStructure {
                    message: format!("unexpected end of document inside simpleType '{name}'"),
                });
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if values.is_empty() {
        tracing::debug!("simpleType {} has no enumeration, skipping", name);
        return Ok(None);
    }

    Ok(Some(TypeDescriptor::new_enum(name, values)))
}

/// Parses a top-level element with content, which may define its type inline.
fn parse_element(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    doc: &mut Document,
) -> Result<(), ParseError> {
    let name = required_attr(e, "element", "name")?;
    if let Some(type_name) = attr(e, "type")? {
        let type_ref = doc.resolve(&type_name);
        doc.elements.insert(name.clone(), type_ref);
    }

    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref child)) => {
                if local_name(child)? == "complexType" {
                    let inline = parse_complex_type(reader, doc, name.clone())?;
                    doc.types.push(inline);
                    doc.elements.insert(name.clone(), TypeRef::local(name.clone()));
                } else {
                    depth += 1;
                }
            }
            Ok(Event::Empty(ref child)) => {
                if local_name(child)? == "complexType" {
                    doc.types
                        .push(TypeDescriptor::new_composite(name.clone(), None, Vec::new()));
                    doc.elements.insert(name.clone(), TypeRef::local(name.clone()));
                }
            }
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Parses a message declaration, keeping its first part.
fn parse_message(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    doc: &mut Document,
) -> Result<(), ParseError> {
    let name = required_attr(e, "message", "name")?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref child)) => {
                if local_name(child)? == "part" {
                    let part = parse_part(child, doc)?;
                    doc.messages.entry(name.clone()).or_insert(part);
                }
                skip_to_end(reader)?;
            }
            Ok(Event::Empty(ref child)) => {
                if local_name(child)? == "part" {
                    let part = parse_part(child, doc)?;
                    doc.messages.entry(name.clone()).or_insert(part);
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Parses a message part referencing either an element or a type.
fn parse_part(e: &BytesStart<'_>, doc: &Document) -> Result<MessagePart, ParseError> {
    if let Some(element) = attr(e, "element")? {
        return Ok(MessagePart::Element(strip_prefix(&element).to_string()));
    }
    match attr(e, "type")? {
        Some(type_name) => Ok(MessagePart::Type(doc.resolve(&type_name))),
        None => Err(ParseError::missing_attr("part", "element")),
    }
}

/// Parses a port type and its operations.
fn parse_port_type(reader: &mut Reader<&[u8]>, doc: &mut Document) -> Result<(), ParseError> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref child)) => {
                if local_name(child)? == "operation" {
                    let name = required_attr(child, "operation", "name")?;
                    let operation = parse_operation(reader, name)?;
                    doc.operations.push(operation);
                } else {
                    skip_to_end(reader)?;
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Parses the input/output messages of a port type operation.
fn parse_operation(reader: &mut Reader<&[u8]>, name: String) -> Result<RawOperation, ParseError> {
    let mut operation = RawOperation {
        name,
        input: None,
        output: None,
    };
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref child)) => {
                record_message(&mut operation, child)?;
                skip_to_end(reader)?;
            }
            Ok(Event::Empty(ref child)) => record_message(&mut operation, child)?,
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(operation)
}

/// Records an `input` or `output` message reference on an operation.
fn record_message(operation: &mut RawOperation, e: &BytesStart<'_>) -> Result<(), ParseError> {
    let message = attr(e, "message")?.map(|m| strip_prefix(&m).to_string());
    match local_name(e)?.as_str() {
        "input" => operation.input = message,
        "output" => operation.output = message,
        _ => {}
    }
    Ok(())
}

/// Returns the local part of an element name (`xsd:element` -> `element`).
fn local_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(e.local_name().as_ref())?.to_string())
}

/// Returns an attribute value, if present.
fn attr(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, ParseError> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key.as_bytes() {
            return Ok(Some(std::str::from_utf8(&attr.value)?.to_string()));
        }
    }
    Ok(None)
}

/// Returns a required attribute value.
fn required_attr(e: &BytesStart<'_>, element: &str, key: &str) -> Result<String, ParseError> {
    attr(e, key)?.ok_or_else(|| ParseError::missing_attr(element, key))
}

/// Drops the namespace prefix of a QName.
fn strip_prefix(qname: &str) -> &str {
    qname.split_once(':').map_or(qname, |(_, local)| local)
}

/// Skips to the end of the current element.
fn skip_to_end(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}
