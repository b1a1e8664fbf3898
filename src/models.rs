use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored document: a schemaless JSON object.
pub type Document = serde_json::Map<String, Value>;

/// Opaque identifier assigned by the store on create.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A form field-set that can be edited one field at a time and sent to the
/// store as a whole.
pub trait FieldSet: Serialize {
    type Field: Copy;

    fn get(&self, field: Self::Field) -> &str;

    /// Replaces one field, leaving the others untouched.
    fn set(&mut self, field: Self::Field, value: String);

    fn to_document(&self) -> Result<Document, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "field-set serialized to a non-object: {other}"
            ))),
        }
    }
}

/// Field-set of the add form. `rated` and `rating` are never bound to an
/// input but are always written on create.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct NewMovie {
    pub title: String,
    pub year: String,
    pub description: String,
    pub image: String,
    pub rated: i32,
    pub rating: i32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NewMovieField {
    Title,
    Year,
    Description,
    Image,
}

impl FieldSet for NewMovie {
    type Field = NewMovieField;

    fn get(&self, field: NewMovieField) -> &str {
        match field {
            NewMovieField::Title => &self.title,
            NewMovieField::Year => &self.year,
            NewMovieField::Description => &self.description,
            NewMovieField::Image => &self.image,
        }
    }

    fn set(&mut self, field: NewMovieField, value: String) {
        match field {
            NewMovieField::Title => self.title = value,
            NewMovieField::Year => self.year = value,
            NewMovieField::Description => self.description = value,
            NewMovieField::Image => self.image = value,
        }
    }
}

/// Field-set of the update form. Uses `name` where the add form writes
/// `title`; the two are deliberately kept apart.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MovieEdit {
    pub name: String,
    pub year: String,
    pub description: String,
    pub image: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MovieEditField {
    Name,
    Year,
    Description,
    Image,
}

impl MovieEdit {
    /// Reads all four fields from a stored document. Missing or null keys
    /// read as empty text.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            name: text_field(doc, "name"),
            year: text_field(doc, "year"),
            description: text_field(doc, "description"),
            image: text_field(doc, "image"),
        }
    }
}

impl FieldSet for MovieEdit {
    type Field = MovieEditField;

    fn get(&self, field: MovieEditField) -> &str {
        match field {
            MovieEditField::Name => &self.name,
            MovieEditField::Year => &self.year,
            MovieEditField::Description => &self.description,
            MovieEditField::Image => &self.image,
        }
    }

    fn set(&mut self, field: MovieEditField, value: String) {
        match field {
            MovieEditField::Name => self.name = value,
            MovieEditField::Year => self.year = value,
            MovieEditField::Description => self.description = value,
            MovieEditField::Image => self.image = value,
        }
    }
}

pub fn text_field(doc: &Document, key: &str) -> String {
    match doc.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateMovieRequest {
    pub title: String,
    pub year: String,
    pub description: String,
    pub image: String,
}

impl CreateMovieRequest {
    pub fn edits(self) -> [(NewMovieField, String); 4] {
        [
            (NewMovieField::Title, self.title),
            (NewMovieField::Year, self.year),
            (NewMovieField::Description, self.description),
            (NewMovieField::Image, self.image),
        ]
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateMovieRequest {
    pub name: String,
    pub year: String,
    pub description: String,
    pub image: String,
}

impl UpdateMovieRequest {
    pub fn edits(self) -> [(MovieEditField, String); 4] {
        [
            (MovieEditField::Name, self.name),
            (MovieEditField::Year, self.year),
            (MovieEditField::Description, self.description),
            (MovieEditField::Image, self.image),
        ]
    }
}
