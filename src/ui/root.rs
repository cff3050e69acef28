use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::app::domain::{FontFamily, ResolvedTheme, ThemeAttribute};

pub const THEME_COLOR_META: &str = "theme-color";
pub const ACTIVE_FONT_PROPERTY: &str = "--active-font-family";

/// The visual root the store writes derived attributes to.
pub trait RootAttributeSink {
    /// Mark the root with `theme`, removing the other scheme.
    fn apply_theme_class(&mut self, theme: ResolvedTheme);

    /// Mark the root with `font`, removing every other font selector.
    fn apply_font_class(&mut self, font: FontFamily);

    /// Create or update the chrome colour hint.
    fn set_meta_color(&mut self, color: &str);
}

impl<S: RootAttributeSink> RootAttributeSink for Rc<RefCell<S>> {
    fn apply_theme_class(&mut self, theme: ResolvedTheme) {
        self.borrow_mut().apply_theme_class(theme);
    }

    fn apply_font_class(&mut self, font: FontFamily) {
        self.borrow_mut().apply_font_class(font);
    }

    fn set_meta_color(&mut self, color: &str) {
        self.borrow_mut().set_meta_color(color);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    pub name: String,
    pub content: String,
}

/// In-memory model of the document root: `<html>` classes, attributes
/// and style properties, `<body>` classes and `<head>` meta entries.
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    attribute: ThemeAttribute,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    body_classes: BTreeSet<String>,
    head: Vec<MetaTag>,
}

impl DocumentRoot {
    pub fn new(attribute: ThemeAttribute) -> Self {
        Self {
            attribute,
            classes: BTreeSet::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            body_classes: BTreeSet::new(),
            head: Vec::new(),
        }
    }

    pub fn shared(attribute: ThemeAttribute) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(attribute)))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn body_has_class(&self, class: &str) -> bool {
        self.body_classes.contains(class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn style_property(&self, name: &str) -> Option<&str> {
        self.style.get(name).map(String::as_str)
    }

    /// Schemes currently marked on the root, via class or named attribute
    pub fn theme_marks(&self) -> Vec<ResolvedTheme> {
        match &self.attribute {
            ThemeAttribute::Class => ResolvedTheme::all()
                .iter()
                .copied()
                .filter(|theme| self.has_class(theme.as_str()))
                .collect(),
            ThemeAttribute::Named(name) => ResolvedTheme::all()
                .iter()
                .copied()
                .filter(|theme| self.attribute(name) == Some(theme.as_str()))
                .collect(),
        }
    }

    pub fn font_marks(&self) -> Vec<FontFamily> {
        FontFamily::all()
            .iter()
            .copied()
            .filter(|font| self.has_class(&font.class_name()))
            .collect()
    }

    pub fn meta_content(&self, name: &str) -> Option<&str> {
        self.head
            .iter()
            .find(|meta| meta.name == name)
            .map(|meta| meta.content.as_str())
    }

    pub fn meta_count(&self, name: &str) -> usize {
        self.head.iter().filter(|meta| meta.name == name).count()
    }
}

impl Default for DocumentRoot {
    fn default() -> Self {
        Self::new(ThemeAttribute::Class)
    }
}

impl RootAttributeSink for DocumentRoot {
    fn apply_theme_class(&mut self, theme: ResolvedTheme) {
        for other in ResolvedTheme::all() {
            self.classes.remove(other.as_str());
        }
        match &self.attribute {
            ThemeAttribute::Class => {
                self.classes.insert(theme.as_str().to_string());
            }
            ThemeAttribute::Named(name) => {
                self.attributes.insert(name.clone(), theme.as_str().to_string());
            }
        }
    }

    fn apply_font_class(&mut self, font: FontFamily) {
        for other in FontFamily::all() {
            let class = other.class_name();
            self.classes.remove(&class);
            self.body_classes.remove(&class);
        }
        self.classes.insert(font.class_name());
        self.body_classes.insert(font.class_name());
        self.style
            .insert(ACTIVE_FONT_PROPERTY.to_string(), font.css_variable());
    }

    fn set_meta_color(&mut self, color: &str) {
        match self.head.iter_mut().find(|meta| meta.name == THEME_COLOR_META) {
            Some(meta) => meta.content = color.to_string(),
            None => self.head.push(MetaTag {
                name: THEME_COLOR_META.to_string(),
                content: color.to_string(),
            }),
        }
    }
}
