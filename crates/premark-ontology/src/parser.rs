//! Ontology parsing for JSON-LD and RDF/XML schema vocabularies.
//!
//! Both formats reduce to the same model: a class is a subject typed
//! `rdfs:Class` carrying an `rdfs:comment`; a property is a subject
//! typed `rdf:Property` carrying a comment and attached to its owning
//! classes through `schema:domainIncludes` edges. Subjects without a
//! comment are not extracted. Names are namespace-stripped, and names
//! starting with a lowercase letter (primitive datatypes in
//! schema.org-style vocabularies) are dropped.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;
use sophia::api::ns::{rdf, rdfs};
use sophia::api::prelude::*;
use sophia::api::term::matcher::Any;
use sophia::inmem::graph::FastGraph;
use sophia::xml::parser::RdfXmlParser;
use tracing::{debug, info};

use premark_core::{Error, OntologyClass, Result};

/// Supported ontology serializations, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OntologyFormat {
    JsonLd,
    RdfXml,
}

impl OntologyFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jsonld") => Ok(Self::JsonLd),
            Some("rdf") => Ok(Self::RdfXml),
            _ => Err(Error::Config(format!(
                "Unsupported ontology format: {} (expected .jsonld or .rdf)",
                path.display()
            ))),
        }
    }
}

/// Parse an ontology file into a name-keyed class map.
///
/// Zero extracted classes is a configuration error: an empty index
/// would make every retrieval come back empty, so the run must not
/// proceed.
pub fn parse_ontology(path: &Path) -> Result<BTreeMap<String, OntologyClass>> {
    let format = OntologyFormat::from_path(path)?;
    let classes = match format {
        OntologyFormat::JsonLd => parse_jsonld(path)?,
        OntologyFormat::RdfXml => parse_rdfxml(path)?,
    };

    if classes.is_empty() {
        return Err(Error::Config(format!(
            "No classes extracted from ontology {}",
            path.display()
        )));
    }

    info!(
        path = %path.display(),
        class_count = classes.len(),
        "Parsed ontology"
    );
    Ok(classes)
}

/// Strip the namespace from an IRI or compact IRI, keeping the text
/// after the final `/`, `#`, or `:`.
fn local_name(term: &str) -> &str {
    term.rsplit(['/', '#', ':']).next().unwrap_or(term)
}

/// Class names must be non-empty and not start with a lowercase letter.
fn is_class_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| !c.is_lowercase())
}

// ---------------------------------------------------------------------------
// JSON-LD
// ---------------------------------------------------------------------------

fn parse_jsonld(path: &Path) -> Result<BTreeMap<String, OntologyClass>> {
    let raw = std::fs::read_to_string(path)?;
    let doc: Value = serde_json::from_str(&raw)
        .map_err(|e| Error::Ontology(format!("Invalid JSON-LD in {}: {}", path.display(), e)))?;

    let nodes: Vec<&Value> = match &doc {
        Value::Array(items) => items.iter().collect(),
        Value::Object(obj) => match obj.get("@graph") {
            Some(Value::Array(items)) => items.iter().collect(),
            _ => vec![&doc],
        },
        _ => {
            return Err(Error::Ontology(format!(
                "JSON-LD document {} is neither an object nor an array",
                path.display()
            )))
        }
    };

    let mut classes = BTreeMap::new();
    for node in &nodes {
        if !has_type(node, "Class") {
            continue;
        }
        let Some(name) = node_id(node).map(local_name) else {
            continue;
        };
        if !is_class_name(name) {
            debug!(class_name = name, "Excluding non-class name");
            continue;
        }
        let Some(description) = field(node, "comment").and_then(literal_value) else {
            debug!(class_name = name, "Skipping class without description comment");
            continue;
        };
        classes.insert(
            name.to_string(),
            OntologyClass::new(name, description),
        );
    }

    for node in &nodes {
        if !has_type(node, "Property") {
            continue;
        }
        let Some(prop_name) = node_id(node).map(local_name) else {
            continue;
        };
        let Some(description) = field(node, "comment").and_then(literal_value) else {
            debug!(property = prop_name, "Skipping property without description comment");
            continue;
        };
        let Some(domains) = field(node, "domainIncludes") else {
            continue;
        };
        for domain in edge_ids(domains) {
            let class_name = local_name(domain);
            if let Some(class) = classes.get_mut(class_name) {
                class
                    .properties
                    .insert(prop_name.to_string(), description.to_string());
            }
        }
    }

    Ok(classes)
}

/// `@type` may be a single string or an array of strings.
fn has_type(node: &Value, type_local: &str) -> bool {
    match node.get("@type") {
        Some(Value::String(s)) => local_name(s) == type_local,
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .any(|s| local_name(s) == type_local),
        _ => false,
    }
}

fn node_id(node: &Value) -> Option<&str> {
    node.get("@id").and_then(Value::as_str)
}

/// Look up a field by the local part of its key, so `rdfs:comment`,
/// `comment`, and a fully expanded IRI key all resolve.
fn field<'a>(node: &'a Value, local: &str) -> Option<&'a Value> {
    node.as_object()?
        .iter()
        .find(|(key, _)| local_name(key) == local)
        .map(|(_, value)| value)
}

/// A literal is a plain string, an `@value` object, or an array whose
/// first element is one of those.
fn literal_value(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Object(obj) => obj.get("@value").and_then(Value::as_str),
        Value::Array(items) => items.first().and_then(literal_value),
        _ => None,
    }
}

/// An edge is an `@id` object, a bare string, or an array of either.
fn edge_ids(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) => vec![s],
        Value::Object(obj) => obj
            .get("@id")
            .and_then(Value::as_str)
            .into_iter()
            .collect(),
        Value::Array(items) => items.iter().flat_map(edge_ids).collect(),
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// RDF/XML
// ---------------------------------------------------------------------------

fn parse_rdfxml(path: &Path) -> Result<BTreeMap<String, OntologyClass>> {
    let file = File::open(path)?;
    let graph: FastGraph = RdfXmlParser::default()
        .parse(BufReader::new(file))
        .collect_triples()
        .map_err(|e| Error::Ontology(format!("Failed to parse {}: {}", path.display(), e)))?;

    // Comments indexed by subject IRI, shared by classes and properties.
    let mut comments: BTreeMap<String, String> = BTreeMap::new();
    for triple in graph.triples_matching(Any, [rdfs::comment], Any) {
        let triple = triple.map_err(graph_error)?;
        if let (Some(subject), Some(text)) = (triple.s().iri(), triple.o().lexical_form()) {
            comments
                .entry(subject.to_string())
                .or_insert_with(|| text.to_string());
        }
    }

    let mut classes = BTreeMap::new();
    for triple in graph.triples_matching(Any, [rdf::type_], [rdfs::Class]) {
        let triple = triple.map_err(graph_error)?;
        let Some(subject) = triple.s().iri() else {
            continue;
        };
        let name = local_name(subject.as_str()).to_string();
        if !is_class_name(&name) {
            debug!(class_name = %name, "Excluding non-class name");
            continue;
        }
        let Some(description) = comments.get(subject.as_str()).cloned() else {
            debug!(class_name = %name, "Skipping class without description comment");
            continue;
        };
        classes.insert(name.clone(), OntologyClass::new(name, description));
    }

    let mut property_iris: BTreeSet<String> = BTreeSet::new();
    for triple in graph.triples_matching(Any, [rdf::type_], [rdf::Property]) {
        let triple = triple.map_err(graph_error)?;
        if let Some(subject) = triple.s().iri() {
            property_iris.insert(subject.to_string());
        }
    }

    // domainIncludes is matched by local name so both the http and
    // https schema.org namespaces resolve.
    for triple in graph.triples() {
        let triple = triple.map_err(graph_error)?;
        let (Some(predicate), Some(object)) = (triple.p().iri(), triple.o().iri()) else {
            continue;
        };
        if local_name(predicate.as_str()) != "domainIncludes" {
            continue;
        }
        let Some(subject) = triple.s().iri() else {
            continue;
        };
        if !property_iris.contains(subject.as_str()) {
            continue;
        }
        let prop_name = local_name(subject.as_str()).to_string();
        let Some(description) = comments.get(subject.as_str()).cloned() else {
            debug!(property = %prop_name, "Skipping property without description comment");
            continue;
        };
        if let Some(class) = classes.get_mut(local_name(object.as_str())) {
            class.properties.insert(prop_name, description);
        }
    }

    Ok(classes)
}

fn graph_error(e: impl std::fmt::Display) -> Error {
    Error::Ontology(format!("Graph iteration failed: {}", e))
}
