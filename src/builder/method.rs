use super::docblock::DocblockBuilder;
use super::literal::literal;
use super::{Visibility, INDENT};
use crate::code::CodeSequence;
use crate::document::Node;

/// Method argument. An argument without a default is required.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub type_hint: Option<String>,
    pub default: Option<Node>,
}

impl Argument {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    fn render(&self) -> String {
        let mut text = String::new();
        if let Some(type_hint) = &self.type_hint {
            text.push_str(type_hint);
            text.push(' ');
        }
        text.push('$');
        text.push_str(&self.name);
        if let Some(default) = &self.default {
            text.push_str(" = ");
            text.push_str(&literal(default));
        }
        text
    }
}

/// A method under construction.
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    name: String,
    visibility: Visibility,
    is_static: bool,
    arguments: Vec<Argument>,
    body: CodeSequence,
    docblock: Option<DocblockBuilder>,
}

impl MethodBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            arguments: Vec::new(),
            body: CodeSequence::new(),
            docblock: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn body(&self) -> &CodeSequence {
        &self.body
    }

    /// Body fragments, for label-addressed patches.
    pub fn body_mut(&mut self) -> &mut CodeSequence {
        &mut self.body
    }

    pub fn docblock(&self) -> Option<&DocblockBuilder> {
        self.docblock.as_ref()
    }

    pub fn set_visibility(&mut self, visibility: Visibility) -> &mut Self {
        self.visibility = visibility;
        self
    }

    pub fn set_static(&mut self, is_static: bool) -> &mut Self {
        self.is_static = is_static;
        self
    }

    pub fn add_argument(
        &mut self,
        name: impl Into<String>,
        type_hint: Option<&str>,
        default: Option<Node>,
    ) -> &mut Self {
        self.arguments.push(Argument {
            name: name.into(),
            type_hint: type_hint.map(str::to_string),
            default,
        });
        self
    }

    pub fn add_body_line(&mut self, code: impl Into<String>) -> &mut Self {
        self.body.append(code, None);
        self
    }

    /// Builds the docblock in place; repeated calls keep adding to it.
    pub fn set_docblock<F>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut DocblockBuilder),
    {
        build(self.docblock.get_or_insert_with(DocblockBuilder::new));
        self
    }

    /// Arguments in signature order: required ones first, each group in
    /// declaration order.
    pub fn ordered_arguments(&self) -> Vec<&Argument> {
        let (mut ordered, defaulted): (Vec<_>, Vec<_>) =
            self.arguments.iter().partition(|argument| argument.is_required());
        ordered.extend(defaulted);
        ordered
    }

    pub fn signature(&self) -> String {
        let arguments: Vec<String> = self
            .ordered_arguments()
            .into_iter()
            .map(Argument::render)
            .collect();
        format!(
            "{}{} function {}({})",
            self.visibility.as_str(),
            if self.is_static { " static" } else { "" },
            self.name,
            arguments.join(", ")
        )
    }

    /// Lines of the method at class-member indentation. Interface methods
    /// end at the signature.
    pub(super) fn render_lines(&self, with_body: bool) -> Vec<String> {
        let mut lines: Vec<String> = self
            .docblock
            .iter()
            .flat_map(DocblockBuilder::render_lines)
            .map(|line| format!("{INDENT}{line}"))
            .collect();

        if !with_body {
            lines.push(format!("{INDENT}{};", self.signature()));
            return lines;
        }

        lines.push(format!("{INDENT}{}", self.signature()));
        lines.push(format!("{INDENT}{{"));
        lines.extend(self.body.render().into_iter().map(|line| {
            if line.is_empty() {
                line
            } else {
                format!("{INDENT}{INDENT}{line}")
            }
        }));
        lines.push(format!("{INDENT}}}"));
        lines
    }
}
