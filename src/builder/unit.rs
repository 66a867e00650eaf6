use super::docblock::DocblockBuilder;
use super::literal::literal;
use super::method::MethodBuilder;
use super::{labels, Visibility, INDENT};
use crate::code::CodeSequence;
use crate::document::Node;
use crate::naming::{namespace_of, short_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub type_hint: Option<String>,
    pub visibility: Visibility,
    pub default: Option<Node>,
    pub description: Option<String>,
}

impl Property {
    fn render_lines(&self) -> Vec<String> {
        let mut doc = DocblockBuilder::new();
        if let Some(description) = &self.description {
            doc.add_text(description.as_str());
        }
        if let Some(type_hint) = &self.type_hint {
            doc.add_annotation("var", type_hint.as_str());
        }

        let mut lines: Vec<String> = doc
            .render_lines()
            .into_iter()
            .map(|line| format!("{INDENT}{line}"))
            .collect();
        let declaration = match &self.default {
            Some(default) => format!("{} ${} = {};", self.visibility.as_str(), self.name, literal(default)),
            None => format!("{} ${};", self.visibility.as_str(), self.name),
        };
        lines.push(format!("{INDENT}{declaration}"));
        lines
    }
}

/// Model of a class or interface, rendered on demand into a [`CodeSequence`].
#[derive(Debug, Clone)]
pub struct CodeUnit {
    kind: UnitKind,
    name: String,
    namespace: Option<String>,
    parent: Option<String>,
    implements: Vec<String>,
    traits: Vec<String>,
    imports: Vec<String>,
    properties: Vec<Property>,
    methods: Vec<MethodBuilder>,
    docblock: Option<DocblockBuilder>,
}

impl CodeUnit {
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(UnitKind::Class, name.into())
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(UnitKind::Interface, name.into())
    }

    fn new(kind: UnitKind, name: String) -> Self {
        Self {
            kind,
            name,
            namespace: None,
            parent: None,
            implements: Vec::new(),
            traits: Vec::new(),
            imports: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            docblock: None,
        }
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Fully qualified name of the unit.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => crate::naming::qualify(namespace, &self.name),
            None => self.name.clone(),
        }
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn implemented_types(&self) -> &[String] {
        &self.implements
    }

    pub fn traits(&self) -> &[String] {
        &self.traits
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn methods(&self) -> &[MethodBuilder] {
        &self.methods
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) -> &mut Self {
        self.namespace = Some(namespace.into().trim_matches('\\').to_string());
        self
    }

    pub fn set_parent_type(&mut self, parent: impl Into<String>) -> &mut Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn add_implemented_type(&mut self, reference: impl Into<String>) -> &mut Self {
        push_unique(&mut self.implements, reference.into());
        self
    }

    pub fn use_trait(&mut self, reference: impl Into<String>) -> &mut Self {
        push_unique(&mut self.traits, reference.into());
        self
    }

    /// Imports a type that only appears in member bodies.
    pub fn add_import(&mut self, reference: impl Into<String>) -> &mut Self {
        push_unique(&mut self.imports, reference.into());
        self
    }

    pub fn add_property(
        &mut self,
        name: impl Into<String>,
        type_hint: Option<&str>,
        visibility: Visibility,
        default: Option<Node>,
        description: Option<&str>,
    ) -> &mut Property {
        self.properties.push(Property {
            name: name.into(),
            type_hint: type_hint.map(str::to_string),
            visibility,
            default,
            description: description.map(str::to_string),
        });
        let last = self.properties.len() - 1;
        &mut self.properties[last]
    }

    /// Adds a method. A name that is already taken is allowed; the last
    /// definition is the one rendered.
    pub fn add_method(&mut self, name: impl Into<String>) -> &mut MethodBuilder {
        self.methods.push(MethodBuilder::new(name));
        let last = self.methods.len() - 1;
        &mut self.methods[last]
    }

    /// The method that will be rendered under `name`, if any.
    pub fn method_mut(&mut self, name: &str) -> Option<&mut MethodBuilder> {
        self.methods.iter_mut().rev().find(|method| method.name() == name)
    }

    /// Builds the docblock in place; repeated calls keep adding to it.
    pub fn set_docblock<F>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut DocblockBuilder),
    {
        build(self.docblock.get_or_insert_with(DocblockBuilder::new));
        self
    }

    fn references(&self) -> impl Iterator<Item = &str> {
        self.parent
            .iter()
            .chain(&self.implements)
            .chain(&self.traits)
            .chain(&self.imports)
            .map(|reference| reference.trim_start_matches('\\'))
    }

    fn is_local(&self, reference: &str) -> bool {
        namespace_of(reference).is_none() || namespace_of(reference) == self.namespace.as_deref()
    }

    /// Type references that need a `use` statement, in first-seen order.
    ///
    /// A reference whose short name is already taken, by the unit itself, a
    /// local type or an earlier import, is not imported.
    fn collect_imports(&self) -> Vec<String> {
        let mut taken: Vec<&str> = vec![self.name.as_str()];
        taken.extend(
            self.references()
                .filter(|reference| self.is_local(reference))
                .map(short_name),
        );

        let mut imports: Vec<String> = Vec::new();
        for reference in self.references().filter(|reference| !self.is_local(reference)) {
            if imports.iter().any(|import| import == reference) {
                continue;
            }
            let name = short_name(reference);
            if taken.iter().any(|other| other.eq_ignore_ascii_case(name)) {
                continue;
            }
            taken.push(name);
            imports.push(reference.to_string());
        }
        imports
    }

    /// How `reference` is spelled in the body: its short name when local or
    /// imported, fully qualified otherwise.
    fn type_name(&self, reference: &str, imports: &[String]) -> String {
        let reference = reference.trim_start_matches('\\');
        if self.is_local(reference) || imports.iter().any(|import| import == reference) {
            short_name(reference).to_string()
        } else {
            format!("\\{reference}")
        }
    }

    fn declaration(&self, imports: &[String]) -> String {
        let (keyword, mut extends) = match self.kind {
            UnitKind::Class => ("class", self.parent.iter().collect::<Vec<_>>()),
            UnitKind::Interface => (
                "interface",
                self.parent.iter().chain(&self.implements).collect::<Vec<_>>(),
            ),
        };
        extends.dedup();

        let mut line = format!("{keyword} {}", self.name);
        if !extends.is_empty() {
            let names: Vec<String> = extends.iter().map(|reference| self.type_name(reference, imports)).collect();
            line.push_str(&format!(" extends {}", names.join(", ")));
        }
        if self.kind == UnitKind::Class && !self.implements.is_empty() {
            let names: Vec<String> = self
                .implements
                .iter()
                .map(|reference| self.type_name(reference, imports))
                .collect();
            line.push_str(&format!(" implements {}", names.join(", ")));
        }
        line
    }

    /// Renders the unit. Each property is one fragment labeled with its
    /// name, each method one fragment labeled with its name.
    pub fn render(&self) -> CodeSequence {
        let mut code = CodeSequence::new();
        code.append("<?php", Some(labels::OPEN_TAG));
        code.blank_line(1);

        if let Some(namespace) = &self.namespace {
            code.append(format!("namespace {namespace};"), Some(labels::NAMESPACE));
            code.blank_line(1);
        }

        let imports = self.collect_imports();
        if !imports.is_empty() {
            for import in &imports {
                code.append(format!("use {import};"), Some(labels::USE));
            }
            code.blank_line(1);
        }

        if let Some(docblock) = &self.docblock {
            let lines = docblock.render_lines();
            if !lines.is_empty() {
                code.append(lines.join("\n"), Some(labels::DOCBLOCK));
            }
        }
        code.append(self.declaration(&imports), Some(labels::DECLARATION));
        code.append("{", Some(labels::BODY_OPEN));

        for reference in &self.traits {
            code.append(
                format!("{INDENT}use {};", self.type_name(reference, &imports)),
                Some(labels::TRAIT),
            );
        }

        let mut first = self.traits.is_empty();
        let properties = last_by_name(&self.properties, |property| property.name.as_str());
        let methods = last_by_name(&self.methods, MethodBuilder::name);
        let with_body = self.kind == UnitKind::Class;

        let members = properties
            .into_iter()
            .map(|property| (property.name.as_str(), property.render_lines()))
            .chain(
                methods
                    .into_iter()
                    .map(|method| (method.name(), method.render_lines(with_body))),
            );
        for (name, lines) in members {
            if !first {
                code.blank_line(1);
            }
            first = false;
            code.append(lines.join("\n"), Some(name));
        }

        code.append("}", Some(labels::BODY_CLOSE));
        code
    }
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Keeps only the last item for each name, at the position of that item.
fn last_by_name<'a, T, F>(items: &'a [T], name: F) -> Vec<&'a T>
where
    F: Fn(&'a T) -> &'a str,
{
    items
        .iter()
        .enumerate()
        .filter(|&(index, item)| {
            let current = name(item);
            !items[index + 1..].iter().any(|later| name(later) == current)
        })
        .map(|(_, item)| item)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_model() -> CodeUnit {
        let mut unit = CodeUnit::class("User");
        unit.set_namespace("App\\Models")
            .set_parent_type("Illuminate\\Database\\Eloquent\\Model")
            .use_trait("Illuminate\\Database\\Eloquent\\SoftDeletes")
            .set_docblock(|doc| {
                doc.add_text("Generated model");
            });
        unit.add_property(
            "table",
            Some("string"),
            Visibility::Protected,
            Some(Node::from("users")),
            Some("Table name"),
        );
        unit.add_method("posts")
            .add_body_line("return $this->hasMany('App\\Models\\Post', 'user_id', 'id');");
        unit
    }

    #[test]
    fn test_render_class() {
        let text = user_model().render().render_string();
        let expected = r#"<?php

namespace App\Models;

use Illuminate\Database\Eloquent\Model;
use Illuminate\Database\Eloquent\SoftDeletes;

/**
 * Generated model
 */
class User extends Model
{
    use SoftDeletes;

    /**
     * Table name
     *
     * @var string
     */
    protected $table = 'users';

    public function posts()
    {
        return $this->hasMany('App\Models\Post', 'user_id', 'id');
    }
}
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn test_members_are_labeled_by_name() {
        let code = user_model().render();
        assert_eq!(code.labeled("table").count(), 1);
        assert_eq!(code.labeled("posts").count(), 1);
        assert_eq!(code.labeled(labels::USE).count(), 2);
    }

    #[test]
    fn test_patch_after_property() {
        let mut code = user_model().render();
        code.insert_after("table", "\n    protected $connection = 'mysql';", None);
        let text = code.render_string();
        let table = text.find("protected $table").unwrap();
        let connection = text.find("protected $connection").unwrap();
        let posts = text.find("function posts").unwrap();
        assert!(table < connection && connection < posts);
    }

    #[test]
    fn test_render_interface() {
        let mut unit = CodeUnit::interface("UserRepository");
        unit.set_namespace("App\\Repositories")
            .add_implemented_type("App\\Contracts\\Repository")
            .add_implemented_type("Countable");
        unit.add_method("all");
        unit.add_method("findById").add_argument("id", None, None);

        let lines = unit.render().render();
        assert!(lines.contains(&"use App\\Contracts\\Repository;".to_string()));
        assert!(lines.contains(&"interface UserRepository extends Repository, Countable".to_string()));
        assert!(lines.contains(&"    public function all();".to_string()));
        assert!(lines.contains(&"    public function findById($id);".to_string()));
    }

    #[test]
    fn test_class_implements_list() {
        let mut unit = CodeUnit::class("EloquentUserRepository");
        unit.set_namespace("App\\Repositories")
            .add_implemented_type("App\\Repositories\\UserRepository")
            .add_implemented_type("App\\Repositories\\UserRepository");
        let lines = unit.render().render();
        // same namespace needs no import
        assert!(!lines.iter().any(|line| line.starts_with("use ")));
        assert!(lines.contains(&"class EloquentUserRepository implements UserRepository".to_string()));
    }

    #[test]
    fn test_clashing_short_names_stay_qualified() {
        let mut unit = CodeUnit::class("Article");
        unit.set_namespace("App\\Models")
            .set_parent_type("Vendor\\A\\Model")
            .use_trait("Vendor\\B\\Model")
            .use_trait("Vendor\\B\\Searchable");
        let lines = unit.render().render();

        let uses: Vec<_> = lines.iter().filter(|line| line.starts_with("use ")).collect();
        assert_eq!(uses, vec!["use Vendor\\A\\Model;", "use Vendor\\B\\Searchable;"]);
        assert!(lines.contains(&"class Article extends Model".to_string()));
        assert!(lines.contains(&"    use \\Vendor\\B\\Model;".to_string()));
        assert!(lines.contains(&"    use Searchable;".to_string()));
    }

    #[test]
    fn test_reference_named_like_the_unit_stays_qualified() {
        let mut unit = CodeUnit::class("Model");
        unit.set_namespace("App\\Models")
            .set_parent_type("Illuminate\\Database\\Eloquent\\Model");
        let lines = unit.render().render();

        assert!(!lines.iter().any(|line| line.starts_with("use ")));
        assert!(lines.contains(&"class Model extends \\Illuminate\\Database\\Eloquent\\Model".to_string()));
    }

    #[test]
    fn test_duplicate_member_last_wins() {
        let mut unit = CodeUnit::class("Thing");
        unit.add_method("run").add_body_line("first();");
        unit.add_method("other");
        unit.add_method("run").add_body_line("second();");

        let code = unit.render();
        let runs: Vec<_> = code.labeled("run").collect();
        assert_eq!(runs.len(), 1);
        assert!(runs[0].code().contains("second();"));

        let names: Vec<_> = code
            .fragments()
            .filter_map(|fragment| fragment.label())
            .filter(|label| *label == "run" || *label == "other")
            .collect();
        assert_eq!(names, vec!["other", "run"]);

        assert!(unit.method_mut("run").unwrap().body().render() == vec!["second();"]);
    }

    #[test]
    fn test_render_does_not_change_model() {
        let unit = user_model();
        let first = unit.render();
        let second = unit.render();
        assert_eq!(first, second);
        assert_eq!(unit.methods().len(), 1);
    }
}
