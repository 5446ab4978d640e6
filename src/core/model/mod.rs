use std::collections::BTreeMap;

/// Section name to byte count for one object file.
pub type SectionSizes = BTreeMap<String, i64>;

/// Parsed `size` report. Objects are keyed by name, so iteration is sorted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SizeTable {
    pub source: String,
    /// Columns of the last header line read, object column included.
    pub header: Vec<String>,
    pub objects: BTreeMap<String, SectionSizes>,
}

impl SizeTable {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            header: Vec::new(),
            objects: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SectionSizes> {
        self.objects.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Union of the section names used by any object, sorted.
    pub fn section_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .objects
            .values()
            .flat_map(|sizes| sizes.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SectionDelta {
    pub name: String,
    pub old: i64,
    pub new: i64,
}

impl SectionDelta {
    pub fn delta(&self) -> i64 {
        self.new.wrapping_sub(self.old)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObjectDelta {
    pub name: String,
    pub sections: Vec<SectionDelta>,
    pub total: SectionDelta,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Comparison {
    pub only_in_old: Vec<String>,
    pub only_in_new: Vec<String>,
    pub objects: Vec<ObjectDelta>,
}
