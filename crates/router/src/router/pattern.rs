//! Route pattern syntax.
//!
//! - literal bytes match themselves
//! - `:name` captures one path segment, up to the next `/`
//! - `*` or `*name` captures the rest of the path and must come last

use crate::RouteError;

/// The name reported for a catch-all registered as a bare `*`.
pub(crate) const ANY_PARAM_NAME: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'p> {
    Static(&'p str),
    Param(&'p str),
    Any(&'p str),
}

/// Adds the leading `/` a pattern is allowed to omit.
pub(crate) fn normalize(path: &str) -> String {
    if path.starts_with('/') { path.to_owned() } else { format!("/{path}") }
}

/// Splits a normalized pattern into segments.
///
/// Static text is kept whole, so two consecutive static segments never occur.
pub(crate) fn parse(path: &str) -> Result<Vec<Segment<'_>>, RouteError> {
    let mut segments = Vec::new();
    let mut rest = path;

    while !rest.is_empty() {
        let Some(start) = rest.find([':', '*']) else {
            segments.push(Segment::Static(rest));
            break;
        };

        if start > 0 {
            segments.push(Segment::Static(&rest[..start]));
        }

        let after = &rest[start + 1..];
        if rest.as_bytes()[start] == b':' {
            let end = after.find('/').unwrap_or(after.len());
            let name = &after[..end];
            if name.is_empty() {
                return Err(RouteError::invalid_pattern(path, "parameter name must not be empty"));
            }
            if name.contains([':', '*']) {
                let reason = format!("parameter name `{name}` must be followed by `/`");
                return Err(RouteError::invalid_pattern(path, reason));
            }
            segments.push(Segment::Param(name));
            rest = &after[end..];
        } else {
            if after.contains('/') {
                return Err(RouteError::invalid_pattern(path, "wildcard must be the final segment"));
            }
            if after.contains([':', '*']) {
                return Err(RouteError::invalid_pattern(path, format!("invalid wildcard name `{after}`")));
            }
            segments.push(Segment::Any(if after.is_empty() { ANY_PARAM_NAME } else { after }));
            rest = "";
        }
    }

    Ok(segments)
}

/// Names of the params of a parsed pattern, in path order.
pub(crate) fn param_names(segments: &[Segment<'_>]) -> Vec<String> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Param(name) | Segment::Any(name) => Some((*name).to_owned()),
            Segment::Static(_) => None,
        })
        .collect()
}

/// Substitutes `values` for the params of `path`, in order.
///
/// Params without a value keep their placeholder.
pub(crate) fn reverse<S: AsRef<str>>(path: &str, values: &[S]) -> String {
    let Ok(segments) = parse(path) else {
        return path.to_owned();
    };

    let mut values = values.iter();
    let mut url = String::with_capacity(path.len());
    for segment in segments {
        match segment {
            Segment::Static(text) => url.push_str(text),
            Segment::Param(name) => match values.next() {
                Some(value) => url.push_str(value.as_ref()),
                None => {
                    url.push(':');
                    url.push_str(name);
                }
            },
            Segment::Any(name) => match values.next() {
                Some(value) => url.push_str(value.as_ref()),
                None if name == ANY_PARAM_NAME => url.push('*'),
                None => {
                    url.push('*');
                    url.push_str(name);
                }
            },
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::{Segment, normalize, param_names, parse, reverse};
    use crate::RouteError;

    #[test]
    fn parses_static_param_and_any() {
        assert_eq!(
            parse("/users/:user/files/*path").unwrap(),
            vec![Segment::Static("/users/"), Segment::Param("user"), Segment::Static("/files/"), Segment::Any("path")]
        );
        assert_eq!(parse("/static*").unwrap(), vec![Segment::Static("/static"), Segment::Any("*")]);
        assert_eq!(parse("/").unwrap(), vec![Segment::Static("/")]);
    }

    #[test]
    fn param_runs_to_next_slash() {
        assert_eq!(parse("/:file.json").unwrap(), vec![Segment::Static("/"), Segment::Param("file.json")]);
        assert_eq!(
            parse("/a/:b/").unwrap(),
            vec![Segment::Static("/a/"), Segment::Param("b"), Segment::Static("/")]
        );
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert!(matches!(parse("/files/*/more"), Err(RouteError::InvalidPattern { .. })));
        assert!(matches!(parse("/users/:/x"), Err(RouteError::InvalidPattern { .. })));
        assert!(matches!(parse("/users/:a:b"), Err(RouteError::InvalidPattern { .. })));
        assert!(matches!(parse("/users/:a*"), Err(RouteError::InvalidPattern { .. })));
        assert!(matches!(parse("/files/**"), Err(RouteError::InvalidPattern { .. })));
    }

    #[test]
    fn normalize_adds_leading_slash() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("users"), "/users");
        assert_eq!(normalize("/users"), "/users");
    }

    #[test]
    fn collects_param_names() {
        let segments = parse("/users/:user/events/*").unwrap();
        assert_eq!(param_names(&segments), vec!["user".to_owned(), "*".to_owned()]);
    }

    #[test]
    fn reverse_fills_params_in_order() {
        assert_eq!(reverse("/users/:user/files/*", &["42", "a/b.txt"]), "/users/42/files/a/b.txt");
        assert_eq!(reverse("/users/:user/files/*name", &["42"]), "/users/42/files/*name");
        assert_eq!(reverse::<&str>("/static", &[]), "/static");
    }
}
