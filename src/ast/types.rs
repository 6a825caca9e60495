use std::collections::HashMap;
use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;

use super::ast::Node;

/// A declared type annotation: `name : Type`. When present it takes
/// priority over anything the inference pass would derive.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: String,
}

impl TypeRef {
    pub fn new(name: &str) -> Self {
        TypeRef {
            name: String::from(name),
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One parameter or struct field, with an optional declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedParam {
    pub name: String,
    pub ty: Option<TypeRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Unix,
    Windows,
    Unc,
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKind {
    Localhost,
    Ipv4,
    Ipv6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Http,
    Https,
    Ftp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Mysql,
    Postgres,
    Mongo,
}

lazy_static! {
    static ref DB_SCHEMES: HashMap<&'static str, DbKind> = {
        let mut map = HashMap::new();
        map.insert("mysql://", DbKind::Mysql);
        map.insert("postgres://", DbKind::Postgres);
        map.insert("mongo://", DbKind::Mongo);
        map
    };
    static ref IPV4_SHAPE: Regex = Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").unwrap();
    static ref IPV6_SHAPE: Regex = Regex::new(r"^[0-9a-fA-F]*(:[0-9a-fA-F]*){2,7}$").unwrap();
}

/// Classifies a resource literal by prefix matching. Checked in a fixed
/// priority order, first match wins — the order is semantically
/// load-bearing (an absolute Windows string must not be misread as a
/// generic relative path, a scheme must win over the host heuristics).
pub fn classify_resource(value: &str, ty: Option<TypeRef>) -> Node {
    let owned = String::from(value);

    if value.starts_with('/') {
        return Node::LocalPath {
            kind: PathKind::Unix,
            value: owned,
            ty,
        };
    }
    if is_windows_drive(value) {
        return Node::LocalPath {
            kind: PathKind::Windows,
            value: owned,
            ty,
        };
    }
    if value.starts_with("http://") {
        return Node::WebUrl {
            kind: UrlKind::Http,
            value: owned,
            ty,
        };
    }
    if value.starts_with("https://") {
        return Node::WebUrl {
            kind: UrlKind::Https,
            value: owned,
            ty,
        };
    }
    if value.starts_with("ftp://") {
        return Node::WebUrl {
            kind: UrlKind::Ftp,
            value: owned,
            ty,
        };
    }
    for (scheme, kind) in DB_SCHEMES.iter() {
        if value.starts_with(scheme) {
            return Node::DbUrl {
                kind: *kind,
                value: owned,
                ty,
            };
        }
    }
    if value.starts_with("localhost") || value.starts_with("127.0.0.1") {
        return Node::RemotePath {
            kind: RemoteKind::Localhost,
            value: owned,
            ty,
        };
    }
    if IPV4_SHAPE.is_match(value) {
        return Node::RemotePath {
            kind: RemoteKind::Ipv4,
            value: owned,
            ty,
        };
    }
    if IPV6_SHAPE.is_match(value) {
        return Node::RemotePath {
            kind: RemoteKind::Ipv6,
            value: owned,
            ty,
        };
    }
    if value.starts_with("\\\\") {
        return Node::LocalPath {
            kind: PathKind::Unc,
            value: owned,
            ty,
        };
    }

    Node::LocalPath {
        kind: PathKind::Relative,
        value: owned,
        ty,
    }
}

fn is_windows_drive(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(value: &str) -> Node {
        classify_resource(value, None)
    }

    #[test]
    fn test_classify_unix_path() {
        assert!(matches!(
            kind_of("/etc/x"),
            Node::LocalPath {
                kind: PathKind::Unix,
                ..
            }
        ));
    }

    #[test]
    fn test_classify_windows_path_before_relative() {
        assert!(matches!(
            kind_of("C:\\x"),
            Node::LocalPath {
                kind: PathKind::Windows,
                ..
            }
        ));
    }

    #[test]
    fn test_classify_web_urls() {
        assert!(matches!(
            kind_of("http://x.com"),
            Node::WebUrl {
                kind: UrlKind::Http,
                ..
            }
        ));
        assert!(matches!(
            kind_of("https://x.com"),
            Node::WebUrl {
                kind: UrlKind::Https,
                ..
            }
        ));
        assert!(matches!(
            kind_of("ftp://files.x.com"),
            Node::WebUrl {
                kind: UrlKind::Ftp,
                ..
            }
        ));
    }

    #[test]
    fn test_classify_db_urls() {
        assert!(matches!(
            kind_of("mysql://db/app"),
            Node::DbUrl {
                kind: DbKind::Mysql,
                ..
            }
        ));
        assert!(matches!(
            kind_of("postgres://db/app"),
            Node::DbUrl {
                kind: DbKind::Postgres,
                ..
            }
        ));
        assert!(matches!(
            kind_of("mongo://db/app"),
            Node::DbUrl {
                kind: DbKind::Mongo,
                ..
            }
        ));
    }

    #[test]
    fn test_classify_hosts() {
        assert!(matches!(
            kind_of("localhost:8080"),
            Node::RemotePath {
                kind: RemoteKind::Localhost,
                ..
            }
        ));
        assert!(matches!(
            kind_of("127.0.0.1"),
            Node::RemotePath {
                kind: RemoteKind::Localhost,
                ..
            }
        ));
        assert!(matches!(
            kind_of("192.168.0.1"),
            Node::RemotePath {
                kind: RemoteKind::Ipv4,
                ..
            }
        ));
        assert!(matches!(
            kind_of("fe80::1"),
            Node::RemotePath {
                kind: RemoteKind::Ipv6,
                ..
            }
        ));
    }

    #[test]
    fn test_classify_unc_path() {
        assert!(matches!(
            kind_of("\\\\server\\share"),
            Node::LocalPath {
                kind: PathKind::Unc,
                ..
            }
        ));
    }

    #[test]
    fn test_classify_relative_fallback() {
        assert!(matches!(
            kind_of("./rel/x"),
            Node::LocalPath {
                kind: PathKind::Relative,
                ..
            }
        ));
        assert!(matches!(
            kind_of("data.csv"),
            Node::LocalPath {
                kind: PathKind::Relative,
                ..
            }
        ));
    }
}
