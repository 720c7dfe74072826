//! Explicit field tables mapping a struct to document entries.

use crate::{
    Document, Error,
    convert::{Converter, FromIni, Native, ToIni},
};
use std::fmt;

#[cfg(test)]
#[path = "./binding_tests.rs"]
mod tests;

trait Accessor<T> {
    /// Reads the field from `doc` into `target`. Returns `false` if the entry
    /// is missing or does not convert, in which case `target` is untouched.
    fn load(&self, doc: &Document, section: &str, key: &str, target: &mut T) -> bool;
    fn store(&self, source: &T) -> Option<String>;
}

struct Typed<T, V, C> {
    converter: C,
    get: fn(&T) -> &V,
    set: fn(&mut T, V),
}

impl<T, V, C: Converter<V>> Accessor<T> for Typed<T, V, C> {
    fn load(&self, doc: &Document, section: &str, key: &str, target: &mut T) -> bool {
        let Some(text) = doc.lookup(section, key) else {
            return false;
        };
        match self.converter.parse(&text, doc.options().comparison) {
            Some(value) => {
                (self.set)(target, value);
                true
            }
            None => {
                tracing::debug!(section, key, value = %text, "field did not convert");
                false
            }
        }
    }

    fn store(&self, source: &T) -> Option<String> {
        self.converter.format((self.get)(source))
    }
}

struct Field<T> {
    section: Option<String>,
    key: String,
    accessor: Box<dyn Accessor<T>>,
}

/// Maps the fields of `T` to `(section, key)` entries of a [`Document`].
///
/// Each field is registered with a getter and a setter, and a [`Converter`]
/// for its value type. Fields live in the binding's section unless given one
/// of their own.
///
/// ```
/// use iniedit::{Binding, Document};
///
/// #[derive(Default)]
/// struct Window {
///     width: u32,
///     title: String,
/// }
///
/// let binding = Binding::<Window>::new()
///     .with_section("window")
///     .field("width", |w| &w.width, |w, v| w.width = v)
///     .field("title", |w| &w.title, |w, v| w.title = v);
///
/// let mut doc: Document = "[window]\nwidth = 640\n".parse()?;
/// let mut window = Window::default();
/// binding.load(&doc, &mut window);
/// assert_eq!(window.width, 640);
///
/// window.title = "main".into();
/// binding.store(&window, &mut doc)?;
/// assert_eq!(doc.read_string("window", "title", ""), "main");
/// # Ok::<(), iniedit::Error>(())
/// ```
pub struct Binding<T> {
    section: String,
    fields: Vec<Field<T>>,
}

impl<T: 'static> Default for Binding<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Binding<T> {
    /// Creates an empty binding whose section is the type path of `T` with
    /// `::` replaced by `.`, e.g. `app.settings.Window`.
    pub fn new() -> Self {
        Self {
            section: std::any::type_name::<T>().replace("::", "."),
            fields: Vec::new(),
        }
    }

    /// Sets the section used by fields without one of their own.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    /// The section used by fields without one of their own.
    pub fn section(&self) -> &str {
        &self.section
    }

    fn push<V: 'static, C: Converter<V> + 'static>(
        mut self,
        section: Option<String>,
        key: &str,
        converter: C,
        get: fn(&T) -> &V,
        set: fn(&mut T, V),
    ) -> Self {
        self.fields.push(Field {
            section,
            key: key.to_owned(),
            accessor: Box::new(Typed {
                converter,
                get,
                set,
            }),
        });
        self
    }

    /// Registers a field converted with [`Native`].
    pub fn field<V>(self, key: &str, get: fn(&T) -> &V, set: fn(&mut T, V)) -> Self
    where
        V: FromIni + ToIni + 'static,
    {
        self.push(None, key, Native, get, set)
    }

    /// Registers a field converted with `converter`.
    pub fn field_with<V, C>(self, key: &str, converter: C, get: fn(&T) -> &V, set: fn(&mut T, V)) -> Self
    where
        V: 'static,
        C: Converter<V> + 'static,
    {
        self.push(None, key, converter, get, set)
    }

    /// Registers a field in `section` rather than the binding's section.
    pub fn field_in<V>(self, section: &str, key: &str, get: fn(&T) -> &V, set: fn(&mut T, V)) -> Self
    where
        V: FromIni + ToIni + 'static,
    {
        self.push(Some(section.to_owned()), key, Native, get, set)
    }

    /// The `(section, key)` pairs of every field, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|field| (self.field_section(field), field.key.as_str()))
    }

    fn field_section<'a>(&'a self, field: &'a Field<T>) -> &'a str {
        field.section.as_deref().unwrap_or(&self.section)
    }

    /// Reads every field from `doc` into `target`.
    ///
    /// Fields whose entry is missing or does not convert keep their current
    /// value. Returns the number of fields that were set.
    pub fn load(&self, doc: &Document, target: &mut T) -> usize {
        let loaded = self
            .fields
            .iter()
            .filter(|field| {
                field
                    .accessor
                    .load(doc, self.field_section(field), &field.key, target)
            })
            .count();
        tracing::debug!(section = %self.section, loaded, fields = self.fields.len(), "loaded binding");
        loaded
    }

    /// Writes every field of `source` into `doc`.
    ///
    /// Fields without a text form, such as `None`, are skipped. An empty
    /// string removes the entry, as with [`Document::write_string`].
    ///
    /// # Errors
    ///
    /// Fails if a key or section name is invalid, leaving `doc` unchanged.
    pub fn store(&self, source: &T, doc: &mut Document) -> Result<(), Error> {
        let mut staged = doc.clone();
        for field in &self.fields {
            let Some(text) = field.accessor.store(source) else {
                continue;
            };
            staged.write_string(self.field_section(field), &field.key, &text)?;
        }
        *doc = staged;
        Ok(())
    }
}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for field in &self.fields {
            list.entry(&(
                field.section.as_deref().unwrap_or(&self.section),
                &field.key,
            ));
        }
        list.finish()
    }
}
