//! Graphviz DOT export implementation.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// DOT exporter: writes the import graph only.
pub struct DotExporter;

impl Exporter for DotExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writer.write_all(data.dot.as_bytes())
    }
}
