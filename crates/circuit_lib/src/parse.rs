//! Parsers for the textual port-reference and delay-matrix notations.
//!
//! Delay annotations on a circuit model name their endpoints with a compact port
//! list and give their values as a 2-D table:
//!
//! ```text
//! in:     a b[0] sel[1:1]
//! out:    out
//! delays: 1.2 3.4 5.6
//! ```
//!
//! These parsers only check syntax. Resolving names against a model's ports, pin
//! bounds, and matrix dimensions is left to the timing graph builder.

use std::num::ParseFloatError;

/// A syntax error in a port list or delay matrix.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// A port reference is not `name`, `name[i]` or `name[msb:lsb]`.
    #[error("malformed port reference '{0}'")]
    PortReference(String),

    /// A delay matrix cell is not a number.
    #[error("invalid delay value '{text}' in row {row}: {source}")]
    DelayValue {
        /// The offending cell.
        text: String,
        /// Zero-based row of the cell.
        row: usize,
        /// The underlying float parse failure.
        #[source]
        source: ParseFloatError,
    },

    /// A delay matrix row has a different length than the first row.
    #[error("delay matrix row {row} has {found} values, expected {expected}")]
    RaggedMatrix {
        /// Zero-based row index.
        row: usize,
        /// Number of values found in the row.
        found: usize,
        /// Number of values in the first row.
        expected: usize,
    },
}

/// One parsed entry of a port list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRef {
    /// The referenced port name.
    pub name: String,
    /// An explicit `[msb:lsb]` selection; `[i]` is stored as `(i, i)`.
    /// `None` selects the whole width of the port.
    pub range: Option<(usize, usize)>,
}

impl PortRef {
    /// Returns the single pin this reference selects, if its range is one pin wide.
    pub fn single_pin(&self) -> Option<usize> {
        match self.range {
            Some((msb, lsb)) if msb == lsb => Some(lsb),
            _ => None,
        }
    }
}

/// Parses a whitespace-separated list of port references.
pub fn parse_port_refs(text: &str) -> Result<Vec<PortRef>, ParseError> {
    text.split_whitespace().map(parse_port_ref).collect()
}

fn parse_port_ref(token: &str) -> Result<PortRef, ParseError> {
    let malformed = || ParseError::PortReference(token.to_string());

    let Some(open) = token.find('[') else {
        if !is_port_name(token) {
            return Err(malformed());
        }
        return Ok(PortRef {
            name: token.to_string(),
            range: None,
        });
    };

    let name = &token[..open];
    let inner = token[open + 1..].strip_suffix(']').ok_or_else(malformed)?;
    if !is_port_name(name) {
        return Err(malformed());
    }

    let parse_index = |s: &str| s.trim().parse::<usize>().map_err(|_| malformed());
    let range = match inner.split_once(':') {
        Some((msb, lsb)) => (parse_index(msb)?, parse_index(lsb)?),
        None => {
            let pin = parse_index(inner)?;
            (pin, pin)
        }
    };

    Ok(PortRef {
        name: name.to_string(),
        range: Some(range),
    })
}

fn is_port_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.')
}

/// A rectangular table of delay values.
///
/// Rows follow the output references of an annotation, columns its input references.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DelayMatrix {
    rows: Vec<Vec<f64>>,
}

impl DelayMatrix {
    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (zero for an empty matrix).
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Returns the value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    /// Iterates over `(row, col, value)` for every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows.iter().enumerate().flat_map(|(i, row)| {
            row.iter().enumerate().map(move |(j, &value)| (i, j, value))
        })
    }
}

/// Parses a delay matrix.
///
/// Rows are separated by newlines or `;`, cells by whitespace or `,`. Blank rows are
/// skipped, so empty text yields an empty matrix.
pub fn parse_delay_matrix(text: &str) -> Result<DelayMatrix, ParseError> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for line in text.split(['\n', ';']) {
        let cells: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|cell| !cell.is_empty())
            .collect();
        if cells.is_empty() {
            continue;
        }

        let row_index = rows.len();
        let row = cells
            .iter()
            .map(|cell| {
                cell.parse::<f64>().map_err(|source| ParseError::DelayValue {
                    text: cell.to_string(),
                    row: row_index,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(ParseError::RaggedMatrix {
                    row: row_index,
                    found: row.len(),
                    expected: first.len(),
                });
            }
        }
        rows.push(row);
    }

    Ok(DelayMatrix { rows })
}
