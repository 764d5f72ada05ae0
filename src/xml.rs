//! Blueprint XML export.
//!
//! Generates a document of the form:
//!
//! ```xml
//! <Schema Name="app" Database="App" TableSchema="dbo" Connection="sqlsrv">
//!   <Table Name="users">
//!     <Column Name="id" Type="int" Size="10" Scale="0" Nullable="False" AutoIncrement="True"/>
//!     <Key Kind="primary">
//!       <Column Name="id"/>
//!     </Key>
//!     <Key Kind="foreign" Index="fk_org" OnSchema="app" OnTable="orgs">
//!       <Column Name="org_id"/>
//!       <References Name="id"/>
//!     </Key>
//!   </Table>
//! </Schema>
//! ```

use std::io::Write;

use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::error::BlueprintError;
use crate::model::{Blueprint, Column, Key};
use crate::schema::Schema;

fn bool_attr(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Write a `<Name Name="value"/>` element, the shape used for key members.
fn write_named<W: Write>(writer: &mut Writer<W>, element: &str, name: &str) -> Result<()> {
    let elem = BytesStart::new(element).with_attributes([("Name", name)]);
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

fn write_column<W: Write>(writer: &mut Writer<W>, column: &Column) -> Result<()> {
    let mut elem = BytesStart::new("Column")
        .with_attributes([("Name", column.name.as_str()), ("Type", column.type_name.as_str())]);
    if let Some(size) = column.size {
        elem.push_attribute(("Size", size.to_string().as_str()));
    }
    if let Some(scale) = column.scale {
        elem.push_attribute(("Scale", scale.to_string().as_str()));
    }
    elem.push_attribute(("Nullable", bool_attr(column.nullable)));
    elem.push_attribute(("AutoIncrement", bool_attr(column.autoincrement)));
    if let Some(default) = &column.default {
        elem.push_attribute(("Default", default.as_str()));
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

fn write_key<W: Write>(writer: &mut Writer<W>, key: &Key) -> Result<()> {
    let mut elem = BytesStart::new("Key").with_attributes([("Kind", key.name())]);
    if let Some(index) = &key.index {
        elem.push_attribute(("Index", index.as_str()));
    }
    if let Some(on) = &key.on {
        elem.push_attribute(("OnSchema", on.schema.as_str()));
        elem.push_attribute(("OnTable", on.table.as_str()));
    }
    writer.write_event(Event::Start(elem))?;

    for column in &key.columns {
        write_named(writer, "Column", column)?;
    }
    for column in &key.references {
        write_named(writer, "References", column)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Key")))?;
    Ok(())
}

/// Write one `<Table>` element.
///
/// Keys follow the columns: primary key, unique indexes, plain indexes,
/// then foreign keys.
pub fn write_table<W: Write>(writer: &mut Writer<W>, blueprint: &Blueprint) -> Result<()> {
    let elem = BytesStart::new("Table").with_attributes([("Name", blueprint.table())]);
    writer.write_event(Event::Start(elem))?;

    for column in blueprint.columns() {
        write_column(writer, column)?;
    }
    for key in blueprint
        .primary_key()
        .into_iter()
        .chain(blueprint.unique_keys())
        .chain(blueprint.indexes())
        .chain(blueprint.relations())
    {
        write_key(writer, key)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Table")))?;
    Ok(())
}

/// Write the whole schema as a `<Schema>` document
pub fn write_schema<W: Write, C>(writer: &mut Writer<W>, schema: &Schema<C>) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut attrs = vec![("Name", schema.schema())];
    if let Some(database) = schema.database() {
        attrs.push(("Database", database));
    }
    attrs.push(("TableSchema", schema.table_schema()));
    attrs.push(("Connection", schema.connection_name()));
    let elem = BytesStart::new("Schema").with_attributes(attrs);
    writer.write_event(Event::Start(elem))?;

    for blueprint in schema.tables() {
        write_table(writer, blueprint)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Schema")))?;
    Ok(())
}

fn into_string(buffer: Vec<u8>) -> Result<String> {
    let xml = String::from_utf8(buffer).map_err(|e| BlueprintError::XmlGenerationError {
        message: e.to_string(),
    })?;
    Ok(xml)
}

/// Render the whole schema as an indented XML string
pub fn schema_to_string<C>(schema: &Schema<C>) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_schema(&mut writer, schema)?;
    into_string(writer.into_inner())
}

/// Render a single table as an indented XML string
pub fn table_to_string(blueprint: &Blueprint) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_table(&mut writer, blueprint)?;
    into_string(writer.into_inner())
}
