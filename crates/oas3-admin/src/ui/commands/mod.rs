use comfy_table::{Cell, ContentArrangement, Row, Table};

use crate::ui::{Colors, colors::Role, term_width};

pub mod generate;
pub mod list;
pub mod validate;

pub use generate::{GenerateConfig, generate_components};
pub use list::{list_operations, list_targets};
pub use validate::validate_data;

/// Borderless table sized to the terminal, with a colored header row.
fn new_table(headers: &[&str], colors: &Colors) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in headers {
    row.add_cell(Cell::new(header).fg(colors.comfy(Role::Label)));
  }
  table.set_header(row);
  table
}
