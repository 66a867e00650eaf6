//! Case conversion and class-name helpers shared by the builder and generators.

use std::path::PathBuf;

fn words(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(|c: char| c == '_' || c == '-' || c == ' ' || c == '.')
        .filter(|word| !word.is_empty())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `find_by_id`, `find-by-id` and `findById` all become `FindById`.
pub fn upper_camel(input: &str) -> String {
    words(input).map(capitalize).collect()
}

/// `user_id` becomes `userId`.
pub fn camel(input: &str) -> String {
    let upper = upper_camel(input);
    let mut chars = upper.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `blog_posts` becomes `Blog Posts`.
pub fn title(input: &str) -> String {
    words(input).map(capitalize).collect::<Vec<_>>().join(" ")
}

/// Naive English singular for table names.
pub fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["sses", "shes", "ches", "xes"] {
        if name.ends_with(suffix) {
            return name[..name.len() - 2].to_string();
        }
    }
    match name.strip_suffix('s') {
        Some(stem) if !stem.ends_with('s') && !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

/// Last segment of a `\`-separated type reference.
pub fn short_name(reference: &str) -> &str {
    let reference = reference.trim_start_matches('\\');
    reference.rsplit('\\').next().unwrap_or(reference)
}

/// Namespace part of a `\`-separated type reference, if any.
pub fn namespace_of(reference: &str) -> Option<&str> {
    let reference = reference.trim_start_matches('\\');
    reference.rsplit_once('\\').map(|(namespace, _)| namespace)
}

/// Joins a namespace and a class name.
pub fn qualify(namespace: &str, class: &str) -> String {
    let namespace = namespace.trim_matches('\\');
    if namespace.is_empty() {
        class.to_string()
    } else {
        format!("{namespace}\\{class}")
    }
}

/// Source path of a class following the `App\` -> `app/` autoload convention.
pub fn class_path(qualified: &str) -> PathBuf {
    let mut path = PathBuf::new();
    let mut segments = qualified.trim_start_matches('\\').split('\\').peekable();
    if let Some(first) = segments.next() {
        if segments.peek().is_none() {
            return PathBuf::from(format!("{first}.php"));
        }
        path.push(if first == "App" { "app" } else { first });
    }
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            path.push(format!("{segment}.php"));
        } else {
            path.push(segment);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_camel() {
        assert_eq!(upper_camel("findById"), "FindById");
        assert_eq!(upper_camel("find_by_id"), "FindById");
        assert_eq!(upper_camel("has-many"), "HasMany");
        assert_eq!(upper_camel("_leading"), "Leading");
        assert_eq!(upper_camel(""), "");
    }

    #[test]
    fn test_camel() {
        assert_eq!(camel("user_id"), "userId");
        assert_eq!(camel("has-one"), "hasOne");
        assert_eq!(camel("posts"), "posts");
    }

    #[test]
    fn test_title() {
        assert_eq!(title("blog_posts"), "Blog Posts");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("users"), "user");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("class"), "class");
        assert_eq!(singularize("staff"), "staff");
    }

    #[test]
    fn test_type_reference_parts() {
        assert_eq!(short_name("Illuminate\\Database\\Eloquent\\Model"), "Model");
        assert_eq!(short_name("\\Model"), "Model");
        assert_eq!(
            namespace_of("Illuminate\\Database\\Eloquent\\Model"),
            Some("Illuminate\\Database\\Eloquent")
        );
        assert_eq!(namespace_of("Model"), None);
        assert_eq!(qualify("App\\Models\\", "User"), "App\\Models\\User");
        assert_eq!(qualify("", "User"), "User");
    }

    #[test]
    fn test_class_path() {
        assert_eq!(class_path("App\\Models\\User"), PathBuf::from("app/Models/User.php"));
        assert_eq!(class_path("Domain\\User"), PathBuf::from("Domain/User.php"));
        assert_eq!(class_path("User"), PathBuf::from("User.php"));
    }
}
