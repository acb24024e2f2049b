use log::warn;
use mml2tex_tree::{ElementKind, MathNode};

use crate::walker::{RenderResult, Walker};

const CELL_SEPARATOR: &str = " & ";
const ROW_SEPARATOR: &str = r" \\ ";

impl Walker<'_> {
    /// `<mtable>` as a `matrix` environment, or `array` when column alignment is given.
    ///
    /// Rows shorter than the widest row are padded with empty cells.
    pub(crate) fn table(&mut self, node: &MathNode) -> RenderResult<String> {
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(node.children.len());
        for row in &node.children {
            let cells = match row.kind {
                ElementKind::Mtr => row.children.as_slice(),
                ElementKind::Mlabeledtr => {
                    warn!("dropping equation label of <mlabeledtr>");
                    row.children.get(1..).unwrap_or_default()
                }
                // A stray cell or expression forms a row of its own.
                _ => std::slice::from_ref(row),
            };
            let mut rendered = Vec::with_capacity(cells.len());
            for cell in cells {
                rendered.push(self.nested(false, |w| match cell.kind {
                    ElementKind::Mtd => w.row(&cell.children),
                    _ => w.render(cell),
                })?);
            }
            rows.push(rendered);
        }

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(columns, String::new());
        }

        let body = rows
            .iter()
            .map(|row| row.join(CELL_SEPARATOR))
            .collect::<Vec<_>>()
            .join(ROW_SEPARATOR);

        Ok(match node.attr("columnalign") {
            Some(align) => {
                let spec = column_spec(align, columns);
                format!(r"\begin{{array}}{{{spec}}}{body}\end{{array}}")
            }
            None => format!(r"\begin{{matrix}}{body}\end{{matrix}}"),
        })
    }
}

/// Column letters for `array`; the last given alignment repeats for the remaining columns.
fn column_spec(columnalign: &str, columns: usize) -> String {
    let given: Vec<char> = columnalign
        .split_whitespace()
        .map(|align| match align {
            "left" => 'l',
            "right" => 'r',
            _ => 'c',
        })
        .collect();
    (0..columns.max(1))
        .map(|i| given.get(i).or(given.last()).copied().unwrap_or('c'))
        .collect()
}
