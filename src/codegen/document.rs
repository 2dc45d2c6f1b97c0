//! Assembly of the full migration class.

use chrono::NaiveDateTime;
use heck::ToUpperCamelCase;

use crate::models::schema::{ForeignKeyDescriptor, IndexDescriptor, TableSchema};

use super::{
    column::render_column,
    options::{php_escape, php_string, OptionBag, OptionValue},
};

const CHAIN_INDENT: &str = "            ";

/// Generator identity stamped into the header.
#[derive(Debug, Clone)]
pub struct GeneratorInfo {
    pub name: String,
    pub version: String,
    pub generated_at: NaiveDateTime,
}

impl GeneratorInfo {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: chrono::Local::now().naive_local(),
        }
    }
}

/// Text substitutions that only touch the first occurrence.
///
/// Index column lists (`a,b,c`) and multi-word foreign-key rules have always
/// been normalised at their first separator only; `first_separator_only`
/// keeps that output. Turning it off normalises every separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    pub first_separator_only: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Self {
            first_separator_only: true,
        }
    }
}

impl Quirks {
    fn substitute(&self, text: &str, from: char, to: &str) -> String {
        if self.first_separator_only {
            text.replacen(from, to, 1)
        } else {
            text.replace(from, to)
        }
    }
}

/// Class name for a table: upper camel case, separators dropped.
pub fn class_name(table_name: &str) -> String {
    table_name
        .to_upper_camel_case()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

pub fn render_index(index: &IndexDescriptor, quirks: Quirks) -> String {
    let columns = quirks.substitute(&php_escape(&index.columns), ',', "', '");

    let mut options = OptionBag::new();
    options.insert("name", OptionValue::Str(index.name.clone()));
    if index.is_unique() {
        options.insert("unique", OptionValue::Bool(true));
    }
    if index.index_type.eq_ignore_ascii_case("FULLTEXT") {
        options.insert("type", OptionValue::Str("fulltext".to_string()));
    }

    format!("->addIndex(['{}']{})", columns, options.render_argument())
}

/// `no action` becomes `NO_ACTION`.
fn rule_constant(rule: &str, quirks: Quirks) -> String {
    quirks.substitute(&rule.to_uppercase(), ' ', "_")
}

pub fn render_foreign_key(foreign_key: &ForeignKeyDescriptor, quirks: Quirks) -> String {
    let mut options = OptionBag::new();
    options.insert("constraint", OptionValue::Str(foreign_key.name.clone()));
    options.insert(
        "delete",
        OptionValue::Str(rule_constant(&foreign_key.on_delete, quirks)),
    );
    options.insert(
        "update",
        OptionValue::Str(rule_constant(&foreign_key.on_update, quirks)),
    );

    format!(
        "->addForeignKey({}, {}, {}{})",
        php_string(&foreign_key.column),
        php_string(&foreign_key.referenced_table),
        php_string(&foreign_key.referenced_column),
        options.render_argument()
    )
}

/// A Phinx migration class for one table.
pub struct MigrationDocument<'a> {
    schema: &'a TableSchema,
    generator: &'a GeneratorInfo,
    quirks: Quirks,
}

impl<'a> MigrationDocument<'a> {
    pub fn new(schema: &'a TableSchema, generator: &'a GeneratorInfo, quirks: Quirks) -> Self {
        Self {
            schema,
            generator,
            quirks,
        }
    }

    pub fn class_name(&self) -> String {
        class_name(&self.schema.table.name)
    }

    fn push_section(out: &mut String, title: &str, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }
        out.push_str(&format!("{}// {}\n", CHAIN_INDENT, title));
        for line in lines {
            out.push_str(CHAIN_INDENT);
            out.push_str(&line);
            out.push('\n');
        }
    }

    pub fn render(&self) -> String {
        let class_name = self.class_name();
        let mut out = String::new();

        out.push_str("<?php\n\n");
        out.push_str("/**\n");
        out.push_str(&format!(
            " * Generated by {} {}\n",
            self.generator.name, self.generator.version
        ));
        out.push_str(&format!(
            " * Generated at {}\n",
            self.generator.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(" *\n");
        out.push_str(&format!(" * Migration class: {}\n", class_name));
        out.push_str(" */\n\n");
        out.push_str("use Phinx\\Migration\\AbstractMigration;\n\n");
        out.push_str(&format!("class {} extends AbstractMigration\n", class_name));
        out.push_str("{\n");
        out.push_str("    public function change()\n");
        out.push_str("    {\n");
        out.push_str(&format!(
            "        $this->table({})\n",
            php_string(&self.schema.table.name)
        ));

        // `id` is created implicitly by Phinx.
        let columns = self
            .schema
            .columns
            .iter()
            .filter(|column| column.name != "id")
            .map(render_column)
            .collect();
        Self::push_section(&mut out, "Columns", columns);

        let indexes = self
            .schema
            .indexes
            .iter()
            .filter(|index| index.name != "PRIMARY")
            .map(|index| render_index(index, self.quirks))
            .collect();
        Self::push_section(&mut out, "Indexes", indexes);

        let foreign_keys = self
            .schema
            .foreign_keys
            .iter()
            .map(|foreign_key| render_foreign_key(foreign_key, self.quirks))
            .collect();
        Self::push_section(&mut out, "Foreign keys", foreign_keys);

        out.push_str(&format!("{}->create();\n", CHAIN_INDENT));
        out.push_str("    }\n");
        out.push_str("}\n");

        out
    }
}
