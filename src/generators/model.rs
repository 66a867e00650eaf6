use super::{schema_table, stamp_author, GeneratedUnit, Generator};
use crate::builder::{quote, CodeUnit, Visibility};
use crate::document::Node;
use crate::naming::{camel, upper_camel};
use crate::schema::{Relation, Schema, Table};
use anyhow::{Context, Result};
use std::rc::Rc;
use tracing::debug;

pub const MODEL_GENERATOR: &str = "model-generator";

pub const ELOQUENT_MODEL: &str = "Illuminate\\Database\\Eloquent\\Model";
pub const SOFT_DELETES: &str = "Illuminate\\Database\\Eloquent\\SoftDeletes";
const RELATIONS_NAMESPACE: &str = "Illuminate\\Database\\Eloquent\\Relations";

/// Generates the model class of one table.
pub struct ModelGenerator {
    schema: Rc<Schema>,
    table: Table,
}

impl ModelGenerator {
    pub fn new(schema: Rc<Schema>, table: &str) -> Result<Self> {
        let table = schema_table(&schema, table)?;
        Ok(Self { schema, table })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The unmodified model, for generator types that extend it.
    pub fn build(&self) -> Result<CodeUnit> {
        let table = &self.table;
        let mut unit = CodeUnit::class(table.model_class(false));
        unit.set_namespace(table.namespaces().model.as_str())
            .set_parent_type(ELOQUENT_MODEL);
        stamp_author(&mut unit, &self.schema, &format!("Model of the '{}' table.", table.name()));

        unit.add_property(
            "table",
            Some("string"),
            Visibility::Protected,
            Some(Node::from(table.name())),
            Some("The table associated with the model."),
        );
        let fillable = table.fillable_columns().into_iter().map(Node::from).collect();
        unit.add_property(
            "fillable",
            Some("array"),
            Visibility::Protected,
            Some(Node::List(fillable)),
            Some("The attributes that are mass assignable."),
        );
        unit.add_property(
            "primaryKey",
            Some("string"),
            Visibility::Protected,
            Some(Node::from(table.primary_column())),
            Some("The primary key for the model."),
        );

        if table.soft_delete {
            unit.use_trait(SOFT_DELETES);
            unit.add_property(
                "dates",
                Some("array"),
                Visibility::Protected,
                Some(Node::List(vec![Node::from("deleted_at")])),
                Some("The attributes that should be mutated to dates."),
            );
        }

        for relation in table.relations() {
            self.add_relation(&mut unit, relation)?;
        }
        Ok(unit)
    }

    fn add_relation(&self, unit: &mut CodeUnit, relation: &Relation) -> Result<()> {
        let related = self.schema.table(&relation.table).with_context(|| {
            format!(
                "relation of '{}' points at undefined table '{}'",
                self.table.name(),
                relation.table
            )
        })?;

        let kind = camel(&relation.kind);
        let method_name = if kind == "hasOne" || kind == "belongsTo" {
            related.model_varname()
        } else {
            camel(related.name())
        };
        debug!(table = self.table.name(), relation = %kind, method = %method_name, "adding relation");

        let returns = format!("{}\\{}", RELATIONS_NAMESPACE, upper_camel(&relation.kind));
        unit.add_method(method_name)
            .set_docblock(|doc| {
                doc.add_text(format!("Relation to the '{}' table.", related.name()))
                    .set_return(returns);
            })
            .add_body_line(format!(
                "return $this->{}({}, {}, {});",
                kind,
                quote(&related.model_class(true)),
                quote(&relation.key_to),
                quote(&relation.key_from)
            ));
        Ok(())
    }
}

impl Generator for ModelGenerator {
    fn name(&self) -> &str {
        MODEL_GENERATOR
    }

    fn generate(&self) -> Result<Vec<GeneratedUnit>> {
        Ok(vec![GeneratedUnit::from_unit(&self.build()?)])
    }
}
