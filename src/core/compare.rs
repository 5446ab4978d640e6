use crate::core::model::{Comparison, ObjectDelta, SectionDelta, SectionSizes, SizeTable};
use anyhow::{Result, bail};

const TOTAL_LABEL: &str = "total";

pub fn compare(old: &SizeTable, new: &SizeTable) -> Result<Comparison> {
    check_sections(old, new)?;

    let only_in_old = old
        .objects
        .keys()
        .filter(|name| !new.contains(name))
        .cloned()
        .collect();
    let only_in_new = new
        .objects
        .keys()
        .filter(|name| !old.contains(name))
        .cloned()
        .collect();

    let mut objects = Vec::new();
    for (name, old_sizes) in &old.objects {
        let Some(new_sizes) = new.get(name) else {
            continue;
        };
        objects.push(object_delta(name, old_sizes, new_sizes)?);
    }

    Ok(Comparison {
        only_in_old,
        only_in_new,
        objects,
    })
}

fn object_delta(name: &str, old: &SectionSizes, new: &SectionSizes) -> Result<ObjectDelta> {
    // A repeated header can change columns mid-file; rows must still line up per object.
    if !old.keys().eq(new.keys()) {
        let missing = section_list(old.keys().filter(|s| !new.contains_key(*s)));
        let extra = section_list(new.keys().filter(|s| !old.contains_key(*s)));
        bail!(
            "sections of {:?} differ (only in old: [{}], only in new: [{}])",
            name,
            missing,
            extra
        );
    }

    let mut total_old: i64 = 0;
    let mut total_new: i64 = 0;
    let mut sections = Vec::with_capacity(old.len());

    for (section, &old_value) in old {
        let new_value = new[section];
        total_old = total_old.wrapping_add(old_value);
        total_new = total_new.wrapping_add(new_value);
        sections.push(SectionDelta {
            name: section.clone(),
            old: old_value,
            new: new_value,
        });
    }

    Ok(ObjectDelta {
        name: name.to_string(),
        sections,
        total: SectionDelta {
            name: TOTAL_LABEL.to_string(),
            old: total_old,
            new: total_new,
        },
    })
}

fn section_list<'a>(names: impl Iterator<Item = &'a String>) -> String {
    names.map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn check_sections(old: &SizeTable, new: &SizeTable) -> Result<()> {
    // A table without objects has no columns to disagree with.
    if old.objects.is_empty() || new.objects.is_empty() {
        return Ok(());
    }
    let old_sections = old.section_names();
    let new_sections = new.section_names();
    if old_sections == new_sections {
        return Ok(());
    }

    let missing: Vec<&str> = old_sections
        .iter()
        .filter(|s| !new_sections.contains(s))
        .copied()
        .collect();
    let extra: Vec<&str> = new_sections
        .iter()
        .filter(|s| !old_sections.contains(s))
        .copied()
        .collect();
    bail!(
        "section columns of {:?} and {:?} differ (only in old: [{}], only in new: [{}])",
        old.source,
        new.source,
        missing.join(", "),
        extra.join(", ")
    );
}
