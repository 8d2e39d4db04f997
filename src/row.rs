//! Annotation rows
//!
//! A [`Row`] holds the ten standard CoNLL-U columns of one token. Files in the
//! "plus" format declare their own column list in a `# global.columns = ...`
//! header; columns outside the standard schema are kept on the row as
//! [`Columns::Extended`].
//!
//! Missing columns never stay unset: standard scalar columns fall back to
//! [`PLACEHOLDER`], extra columns to [`EXTRA_PLACEHOLDER`], feature columns to
//! empty [`Features`].

use std::fmt;

use crate::address::{Address, AddressError, AddressParser};
use crate::bytes::parse_int;
use crate::features::{FeatureCodec, Features};

/// Value of an unset standard column.
pub const PLACEHOLDER: &str = "_";

/// Value of an unset extra column in plus files.
pub const EXTRA_PLACEHOLDER: &str = "*";

/// Header prefix declaring the columns of a plus file.
pub const COLUMNS_HEADER: &str = "# global.columns = ";

/// The ten standard columns, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Form,
    Lemma,
    Upos,
    Xpos,
    Feats,
    Head,
    Deprel,
    Deps,
    Misc,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Id,
        Field::Form,
        Field::Lemma,
        Field::Upos,
        Field::Xpos,
        Field::Feats,
        Field::Head,
        Field::Deprel,
        Field::Deps,
        Field::Misc,
    ];

    /// Lowercase column name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Form => "form",
            Field::Lemma => "lemma",
            Field::Upos => "upos",
            Field::Xpos => "xpos",
            Field::Feats => "feats",
            Field::Head => "head",
            Field::Deprel => "deprel",
            Field::Deps => "deps",
            Field::Misc => "misc",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// One column of a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Standard(Field),
    Extra(String),
}

/// Ordered column list of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::standard()
    }
}

impl Schema {
    /// The ten CoNLL-U columns.
    pub fn standard() -> Self {
        Self {
            columns: Field::ALL.into_iter().map(Column::Standard).collect(),
        }
    }

    /// Parse a plus header line such as `# global.columns = ID FORM PARSEME:MWE`.
    ///
    /// Column names are lowercased and `:` becomes `_`. Returns `None` if the
    /// line is not a columns header.
    pub fn from_header(line: &str) -> Option<Self> {
        let names = line.trim_end().strip_prefix(COLUMNS_HEADER)?;
        let columns: Vec<Column> = names
            .split(' ')
            .filter(|name| !name.is_empty())
            .map(|name| {
                let name = name.to_lowercase().replace(':', "_");
                match Field::from_name(&name) {
                    Some(field) => Column::Standard(field),
                    None => Column::Extra(name),
                }
            })
            .collect();
        if columns.is_empty() {
            return None;
        }
        Some(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.columns.contains(&Column::Standard(field))
    }

    /// Whether every column belongs to the standard schema.
    pub fn is_standard(&self) -> bool {
        self.columns.iter().all(|c| matches!(c, Column::Standard(_)))
    }

    /// Names of the extra columns, in order.
    pub fn extra_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().filter_map(|c| match c {
            Column::Extra(name) => Some(name.as_str()),
            Column::Standard(_) => None,
        })
    }
}

/// Head column of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// Governor of the token; the artificial root for `0`.
    Node(Address),
    /// Content that is not an integer (`_` in syntax-free files), kept verbatim.
    Raw(String),
}

impl Head {
    /// Parse the head column. Anything but an integer stays raw.
    pub fn parse(raw: &str) -> Self {
        match parse_int(raw) {
            Some(head) => Head::Node(Address::word(head)),
            None => Head::Raw(raw.to_string()),
        }
    }

    pub fn address(&self) -> Option<Address> {
        match self {
            Head::Node(addr) => Some(*addr),
            Head::Raw(_) => None,
        }
    }
}

impl Default for Head {
    fn default() -> Self {
        Head::Raw(PLACEHOLDER.to_string())
    }
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Head::Node(addr) => write!(f, "{}", addr),
            Head::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Columns beyond the ten standard ones
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Columns {
    #[default]
    Standard,
    /// Extra plus-format columns as `(name, value)` in schema order.
    Extended(Vec<(String, String)>),
}

impl Columns {
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            Columns::Standard => None,
            Columns::Extended(extra) => extra
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
        }
    }
}

/// One token of a sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: Address,
    pub form: String,
    pub lemma: String,
    pub upos: String,
    pub xpos: String,
    pub feats: Features,
    pub head: Head,
    pub deprel: String,
    /// Enhanced dependencies, kept as opaque text.
    pub deps: String,
    pub misc: Features,
    pub columns: Columns,
}

impl Row {
    /// Row with every column at its placeholder.
    pub fn empty(id: Address) -> Self {
        Self {
            id,
            form: PLACEHOLDER.to_string(),
            lemma: PLACEHOLDER.to_string(),
            upos: PLACEHOLDER.to_string(),
            xpos: PLACEHOLDER.to_string(),
            feats: Features::new(),
            head: Head::default(),
            deprel: PLACEHOLDER.to_string(),
            deps: PLACEHOLDER.to_string(),
            misc: Features::new(),
            columns: Columns::Standard,
        }
    }

    /// The artificial root row.
    pub fn root() -> Self {
        Self::empty(Address::ROOT)
    }

    /// Build a row from the tab-separated `fields` of one line.
    ///
    /// Fields beyond the schema are ignored; columns missing from the line or
    /// the schema take their placeholder.
    pub fn from_fields(
        schema: &Schema,
        fields: &[&str],
        addresses: &AddressParser,
        codec: &FeatureCodec,
    ) -> Result<Self, AddressError> {
        let mut raw_id = PLACEHOLDER;
        let mut row = Row::empty(Address::ROOT);
        let mut extra = Vec::new();

        for (i, column) in schema.columns().iter().enumerate() {
            let value = fields.get(i).copied();
            match column {
                Column::Standard(field) => {
                    let Some(value) = value else { continue };
                    match field {
                        Field::Id => raw_id = value,
                        Field::Form => row.form = value.to_string(),
                        Field::Lemma => row.lemma = value.to_string(),
                        Field::Upos => row.upos = value.to_string(),
                        Field::Xpos => row.xpos = value.to_string(),
                        Field::Feats => row.feats = codec.decode(value),
                        Field::Head => row.head = Head::parse(value),
                        Field::Deprel => row.deprel = value.to_string(),
                        Field::Deps => row.deps = value.to_string(),
                        Field::Misc => row.misc = codec.decode(value),
                    }
                }
                Column::Extra(name) => {
                    let value = value.unwrap_or(EXTRA_PLACEHOLDER);
                    extra.push((name.clone(), value.to_string()));
                }
            }
        }

        row.id = addresses.parse(raw_id)?;
        if !schema.is_standard() {
            row.columns = Columns::Extended(extra);
        }
        Ok(row)
    }

    /// Relation label before any `:` subtype.
    pub fn base_deprel(&self) -> &str {
        base_relation(&self.deprel)
    }

    pub fn is_word(&self) -> bool {
        self.id.is_word()
    }
}

/// Part of a relation label before the first `:`.
pub fn base_relation(deprel: &str) -> &str {
    deprel.split_once(':').map_or(deprel, |(base, _)| base)
}
