use super::repository_interface::{signature_customizers, REPOSITORY_METHODS};
use super::{schema_table, stamp_author, GeneratedUnit, Generator};
use crate::builder::{quote, stamp_methods, CodeUnit, Customizers};
use crate::schema::{Schema, Table};
use anyhow::Result;
use std::rc::Rc;

pub const REPOSITORY_CLASS_GENERATOR: &str = "repository-class-generator";

/// Generates the Eloquent implementation of a table's repository interface.
pub struct RepositoryClassGenerator {
    schema: Rc<Schema>,
    table: Table,
}

impl RepositoryClassGenerator {
    pub fn new(schema: Rc<Schema>, table: &str) -> Result<Self> {
        let table = schema_table(&schema, table)?;
        Ok(Self { schema, table })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Interface signatures plus Eloquent bodies.
    pub fn customizers(&self) -> Customizers<'_> {
        let table = &self.table;
        let model = table.model_class(false);
        let primary = table.primary_varname();
        let column = quote(table.primary_column());

        let all = format!("return {model}::all()->toArray();");
        let find = vec![
            format!("$record = {model}::find(${primary});"),
            "return $record ? $record->toArray() : null;".to_string(),
        ];
        let paginate =
            format!("return {model}::paginate($limit, ['*'], 'page', $page)->toArray();");
        let create = format!("return {model}::create($data)->toArray();");
        let update = format!("return (bool) {model}::where({column}, ${primary})->update($data);");
        let delete = format!("return (bool) {model}::where({column}, ${primary})->delete();");

        signature_customizers(table)
            .then("all", move |method| {
                method.add_body_line(all.as_str());
            })
            .then("findById", move |method| {
                for line in &find {
                    method.add_body_line(line.as_str());
                }
            })
            .then("getPagination", move |method| {
                method.add_body_line(paginate.as_str());
            })
            .then("create", move |method| {
                method.add_body_line(create.as_str());
            })
            .then("updateById", move |method| {
                method.add_body_line(update.as_str());
            })
            .then("deleteById", move |method| {
                method.add_body_line(delete.as_str());
            })
    }

    pub fn build_with(&self, customizers: &Customizers<'_>) -> CodeUnit {
        let table = &self.table;
        let mut unit = CodeUnit::class(table.repository_class(false));
        unit.set_namespace(table.namespaces().repository.as_str())
            .add_implemented_type(table.repository_interface(true))
            .add_import(table.model_class(true));
        stamp_author(
            &mut unit,
            &self.schema,
            &format!("Eloquent repository of the '{}' table.", table.name()),
        );
        stamp_methods(&mut unit, REPOSITORY_METHODS, customizers);
        unit
    }

    pub fn build(&self) -> CodeUnit {
        self.build_with(&self.customizers())
    }
}

impl Generator for RepositoryClassGenerator {
    fn name(&self) -> &str {
        REPOSITORY_CLASS_GENERATOR
    }

    fn generate(&self) -> Result<Vec<GeneratedUnit>> {
        Ok(vec![GeneratedUnit::from_unit(&self.build())])
    }
}
