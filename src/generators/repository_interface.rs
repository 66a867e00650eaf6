use super::{schema_table, stamp_author, GeneratedUnit, Generator};
use crate::builder::{stamp_methods, CodeUnit, Customizers};
use crate::document::Node;
use crate::schema::{Schema, Table};
use anyhow::Result;
use std::rc::Rc;

pub const REPOSITORY_INTERFACE_GENERATOR: &str = "repository-interface-generator";

/// Members every repository exposes, in emission order.
pub const REPOSITORY_METHODS: &[&str] = &[
    "all",
    "findById",
    "getPagination",
    "create",
    "updateById",
    "deleteById",
];

/// Arguments and docblocks of the repository members of `table`. The class
/// generator layers method bodies on top of these.
pub fn signature_customizers(table: &Table) -> Customizers<'_> {
    Customizers::new()
        .on("all", move |method| {
            method.set_docblock(|doc| {
                doc.add_text(format!("Get all {}.", table.label()))
                    .set_return("array");
            });
        })
        .on("findById", move |method| {
            let primary = table.primary_varname();
            method
                .add_argument(primary.as_str(), None, None)
                .add_argument("options", Some("array"), Some(Node::List(Vec::new())))
                .set_docblock(|doc| {
                    doc.add_text(format!("Find one {} by its primary key.", table.singular_name()))
                        .add_param(primary.as_str(), "mixed")
                        .add_param("options", "array")
                        .set_return("array|null");
                });
        })
        .on("getPagination", move |method| {
            method
                .add_argument("page", None, Some(Node::Int(1)))
                .add_argument("limit", None, Some(Node::Int(10)))
                .add_argument("options", Some("array"), Some(Node::List(Vec::new())))
                .set_docblock(|doc| {
                    doc.add_text(format!("Get one page of {}.", table.label()))
                        .add_param("page", "int")
                        .add_param("limit", "int")
                        .add_param("options", "array")
                        .set_return("array");
                });
        })
        .on("create", move |method| {
            method
                .add_argument("data", Some("array"), None)
                .set_docblock(|doc| {
                    doc.add_text(format!("Create a {}.", table.singular_name()))
                        .add_param("data", "array")
                        .set_return("array");
                });
        })
        .on("updateById", move |method| {
            let primary = table.primary_varname();
            method
                .add_argument(primary.as_str(), None, None)
                .add_argument("data", Some("array"), None)
                .set_docblock(|doc| {
                    doc.add_text(format!("Update a {} by its primary key.", table.singular_name()))
                        .add_param(primary.as_str(), "mixed")
                        .add_param("data", "array")
                        .set_return("bool");
                });
        })
        .on("deleteById", move |method| {
            let primary = table.primary_varname();
            method
                .add_argument(primary.as_str(), None, None)
                .set_docblock(|doc| {
                    doc.add_text(format!("Delete a {} by its primary key.", table.singular_name()))
                        .add_param(primary.as_str(), "mixed")
                        .set_return("bool");
                });
        })
}

/// Generates the repository interface of one table.
pub struct RepositoryInterfaceGenerator {
    schema: Rc<Schema>,
    table: Table,
}

impl RepositoryInterfaceGenerator {
    pub fn new(schema: Rc<Schema>, table: &str) -> Result<Self> {
        let table = schema_table(&schema, table)?;
        Ok(Self { schema, table })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn build_with(&self, customizers: &Customizers<'_>) -> CodeUnit {
        let table = &self.table;
        let mut unit = CodeUnit::interface(table.repository_interface(false));
        unit.set_namespace(table.namespaces().repository.as_str());
        stamp_author(
            &mut unit,
            &self.schema,
            &format!("Repository of the '{}' table.", table.name()),
        );
        stamp_methods(&mut unit, REPOSITORY_METHODS, customizers);
        unit
    }

    pub fn build(&self) -> CodeUnit {
        self.build_with(&signature_customizers(&self.table))
    }
}

impl Generator for RepositoryInterfaceGenerator {
    fn name(&self) -> &str {
        REPOSITORY_INTERFACE_GENERATOR
    }

    fn generate(&self) -> Result<Vec<GeneratedUnit>> {
        Ok(vec![GeneratedUnit::from_unit(&self.build())])
    }
}
