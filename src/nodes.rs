//! Render-node model for signature output
//!
//! A rendered signature is an ordered sequence of nodes: plain text, named
//! sub-structures (the declaration name, a return/field type group, the
//! parameter list), or cross-reference placeholders awaiting resolution
//! against the symbol registry. The document assembler consumes these nodes;
//! [`plain`] flattens them back to canonical text.

use serde::{Deserialize, Serialize};

/// An unresolved, renderable link target
///
/// `package` and `imported` are captured from the document's import map at
/// formatting time: an imported simple name carries its declaring package,
/// anything else carries the current package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossRef {
    /// Text shown for this reference
    pub display: String,
    /// Lookup target, a simple or partially-qualified dotted name
    pub target: String,
    /// Dotted chain of enclosing type names at the reference site
    pub outer_type: String,
    /// Declaring or current package, when one is known
    pub package: Option<String>,
    /// Whether the target matched the import map
    pub imported: bool,
}

/// One node of a rendered signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureNode {
    /// Literal text
    Text(String),
    /// The declaration's own name
    Name(String),
    /// A type position (return type, field type)
    TypeGroup(Vec<SignatureNode>),
    /// The parameter list of a method or constructor
    Parameters(Vec<ParameterNode>),
    /// A cross-reference placeholder
    XRef(CrossRef),
}

/// A single rendered parameter: its type nodes and its emphasized name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterNode {
    pub type_nodes: Vec<SignatureNode>,
    /// `...` rendered between type and name for varargs parameters
    pub varargs: bool,
    pub name: String,
}

/// Flatten nodes to their canonical plain-text form
pub fn plain(nodes: &[SignatureNode]) -> String {
    let mut out = String::new();
    write_plain(nodes, &mut out);
    out
}

fn write_plain(nodes: &[SignatureNode], out: &mut String) {
    for node in nodes {
        match node {
            SignatureNode::Text(text) => out.push_str(text),
            SignatureNode::Name(name) => out.push_str(name),
            SignatureNode::TypeGroup(inner) => write_plain(inner, out),
            SignatureNode::XRef(xref) => out.push_str(&xref.display),
            SignatureNode::Parameters(params) => {
                out.push('(');
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_plain(&param.type_nodes, out);
                    if param.varargs {
                        out.push_str("...");
                    }
                    out.push(' ');
                    out.push_str(&param.name);
                }
                out.push(')');
            }
        }
    }
}

/// Collect every cross-reference placeholder in a node sequence
pub fn cross_refs(nodes: &[SignatureNode]) -> Vec<&CrossRef> {
    let mut out = Vec::new();
    collect_refs(nodes, &mut out);
    out
}

fn collect_refs<'a>(nodes: &'a [SignatureNode], out: &mut Vec<&'a CrossRef>) {
    for node in nodes {
        match node {
            SignatureNode::XRef(xref) => out.push(xref),
            SignatureNode::TypeGroup(inner) => collect_refs(inner, out),
            SignatureNode::Parameters(params) => {
                for param in params {
                    collect_refs(&param.type_nodes, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xref(display: &str, target: &str) -> SignatureNode {
        SignatureNode::XRef(CrossRef {
            display: display.to_string(),
            target: target.to_string(),
            outer_type: String::new(),
            package: None,
            imported: false,
        })
    }

    #[test]
    fn test_plain_flattening() {
        let nodes = vec![
            SignatureNode::Text("public ".to_string()),
            SignatureNode::TypeGroup(vec![
                xref("List", "List"),
                SignatureNode::Text("<".to_string()),
                xref("String", "String"),
                SignatureNode::Text(">".to_string()),
            ]),
            SignatureNode::Text(" ".to_string()),
            SignatureNode::Name("get".to_string()),
            SignatureNode::Parameters(vec![ParameterNode {
                type_nodes: vec![SignatureNode::Text("int".to_string())],
                varargs: false,
                name: "index".to_string(),
            }]),
        ];
        assert_eq!(plain(&nodes), "public List<String> get(int index)");
    }

    #[test]
    fn test_varargs_plain_form() {
        let nodes = vec![SignatureNode::Parameters(vec![ParameterNode {
            type_nodes: vec![xref("Object", "Object")],
            varargs: true,
            name: "args".to_string(),
        }])];
        assert_eq!(plain(&nodes), "(Object... args)");
    }

    #[test]
    fn test_cross_ref_collection_recurses() {
        let nodes = vec![
            SignatureNode::TypeGroup(vec![xref("List", "List")]),
            SignatureNode::Parameters(vec![ParameterNode {
                type_nodes: vec![xref("Map", "Map")],
                varargs: false,
                name: "m".to_string(),
            }]),
        ];
        let refs = cross_refs(&nodes);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].target, "List");
        assert_eq!(refs[1].target, "Map");
    }
}
