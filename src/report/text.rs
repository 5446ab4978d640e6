use crate::core::model::{Comparison, ObjectDelta, SectionDelta};
use anyhow::Result;
use std::io::Write;

pub const NAME_WIDTH: usize = 30;
pub const VALUE_WIDTH: usize = 11;

pub fn write(w: &mut dyn Write, cmp: &Comparison, old_file: &str, new_file: &str) -> Result<()> {
    write_presence(w, &cmp.only_in_old, old_file, new_file)?;
    write_presence(w, &cmp.only_in_new, new_file, old_file)?;
    for object in &cmp.objects {
        write_object(w, object)?;
    }
    w.flush()?;
    Ok(())
}

fn write_presence(w: &mut dyn Write, names: &[String], found: &str, missing: &str) -> Result<()> {
    for name in names {
        writeln!(
            w,
            "binary {:?} found in {:?} but not in {:?}",
            name, found, missing
        )?;
    }
    Ok(())
}

fn write_object(w: &mut dyn Write, object: &ObjectDelta) -> Result<()> {
    writeln!(w, "== {} ==", object.name)?;
    for row in &object.sections {
        writeln!(w, "{:<nw$} {}", row.name, values(row), nw = NAME_WIDTH)?;
    }
    writeln!(
        w,
        "{:>nw$} {}",
        object.total.name,
        values(&object.total),
        nw = NAME_WIDTH
    )?;
    Ok(())
}

fn values(row: &SectionDelta) -> String {
    format!(
        "{:>vw$} {:>vw$} {:>+vw$}",
        row.old,
        row.new,
        row.delta(),
        vw = VALUE_WIDTH
    )
}
