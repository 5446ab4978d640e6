use crate::core::io::{self, Input, InputKind};
use crate::core::model::{SectionSizes, SizeTable};
use anyhow::{Context, Result, bail};
use std::path::Path;

/// Every line of a `size` report carries at least this many fields.
pub const MIN_FIELDS: usize = 6;

const HEADER_TOKEN: &str = "text";

#[derive(Clone, Copy, Debug)]
pub struct SourceInfo {
    pub kind: InputKind,
    pub bytes: usize,
}

/// Reads a file containing the output of the `size` command.
///
/// ```text
///    text	   data	    bss	    dec	    hex	filename
/// 55876285	 893753	7752192	64522230	3d887f6	daemon/cilium-agent
/// 57015715	 610160	 211608	57837483	37287ab	operator/cilium-operator
/// ```
pub fn read_table(path: &Path) -> Result<(SizeTable, SourceInfo)> {
    let input = Input::open(path)?;
    let info = SourceInfo {
        kind: input.kind,
        bytes: input.bytes().len(),
    };
    let table = parse_table(&path.display().to_string(), input.bytes())?;
    Ok((table, info))
}

pub fn parse_table(source: &str, bytes: &[u8]) -> Result<SizeTable> {
    let mut table = SizeTable::new(source);

    for (idx, raw) in io::lines(bytes).enumerate() {
        let line_no = idx + 1;
        let line = String::from_utf8_lossy(raw);
        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.len() < MIN_FIELDS {
            bail!(
                "invalid file format in {:?} at line {}: expected at least {} fields, found {}",
                source,
                line_no,
                MIN_FIELDS,
                fields.len()
            );
        }

        if fields[0] == HEADER_TOKEN {
            table.header = fields.iter().map(|f| f.to_string()).collect();
            continue;
        }

        if table.header.is_empty() {
            bail!(
                "invalid file format in {:?} at line {}: data row before header line",
                source,
                line_no
            );
        }

        let (name, sizes) = parse_row(&table.header, &fields)
            .with_context(|| format!("invalid row in {:?} at line {}", source, line_no))?;
        table.objects.insert(name, sizes);
    }

    Ok(table)
}

fn parse_row(columns: &[String], fields: &[&str]) -> Result<(String, SectionSizes)> {
    if fields.len() < columns.len() {
        bail!(
            "row has {} fields but the header has {}",
            fields.len(),
            columns.len()
        );
    }
    let numeric = columns.len() - 1;

    let mut sizes = SectionSizes::new();
    for (column, field) in columns[..numeric].iter().zip(fields) {
        let value = parse_hex(field)
            .with_context(|| format!("column {:?}: invalid hex value {:?}", column, field))?;
        sizes.insert(column.clone(), value);
    }

    // Object paths may contain spaces; everything past the numeric columns is the name.
    let name = fields[numeric..].join(" ");
    Ok((name, sizes))
}

/// Base-16 signed integer with an optional sign and `0x` prefix.
pub fn parse_hex(s: &str) -> Result<i64> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .unwrap_or(rest);
    if digits.starts_with(['+', '-']) {
        bail!("misplaced sign in {:?}", s);
    }
    let value = if negative {
        i64::from_str_radix(&format!("-{}", digits), 16)?
    } else {
        i64::from_str_radix(digits, 16)?
    };
    Ok(value)
}
