//! Gateway path template translation.

/// Convert a gateway-style path template into the router's native pattern.
///
/// Brace-delimited parameters become `:name` segments and the result always
/// carries a leading `/`. Total over every input: a template with zero
/// parameters passes through untouched apart from the prefix.
///
/// ```
/// use slsgate::routing::translate_path;
/// assert_eq!(translate_path("users/{id}"), "/users/:id");
/// assert_eq!(translate_path("status"), "/status");
/// ```
pub fn translate_path(template: &str) -> String {
    let mut out = String::with_capacity(template.len() + 1);
    if !template.starts_with('/') {
        out.push('/');
    }
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push(':');
        out.push_str(&rest[open + 1..open + close]);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_parameters_in_position() {
        assert_eq!(translate_path("users/{id}"), "/users/:id");
        assert_eq!(translate_path("a/{id}/b"), "/a/:id/b");
        assert_eq!(translate_path("{x}/{y}"), "/:x/:y");
    }

    #[test]
    fn plain_templates_gain_only_the_prefix() {
        assert_eq!(translate_path("status"), "/status");
        assert_eq!(translate_path("/already/rooted"), "/already/rooted");
        assert_eq!(translate_path(""), "/");
    }

    #[test]
    fn unbalanced_braces_pass_through() {
        assert_eq!(translate_path("a/{id"), "/a/{id");
    }

    #[test]
    fn translation_is_deterministic() {
        let first = translate_path("v1/{tenant}/items/{id}");
        let second = translate_path("v1/{tenant}/items/{id}");
        assert_eq!(first, second);
        assert_eq!(first, "/v1/:tenant/items/:id");
    }
}
