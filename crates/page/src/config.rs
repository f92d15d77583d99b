// ABOUTME: Configuration for page annotation: element locators, unit vocabulary and fragment text.
// ABOUTME: ConfigBuilder provides a fluent API; JSON files may override any subset of the defaults.

use std::fs;
use std::path::Path;

use dom_query::Matcher;
use gigprice_engine::UnitVocabulary;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// Plain CSS identifier: safe inside a selector and the stylesheet unescaped
static CSS_IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[_a-zA-Z][_a-zA-Z0-9-]*$").unwrap());

/// CSS locators for the parts of a package listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locators {
    /// One package box.
    pub container: String,
    /// Price text, searched inside the container.
    pub price: String,
    /// Size text, searched inside the container.
    pub size: String,
    /// Inner template the fragment is placed in, when present.
    pub template: String,
    /// Button inside the template the fragment is placed before, when present.
    pub insert_before: String,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            container: ".card-templ-wrapper".to_string(),
            price: ".card-price .fa-number".to_string(),
            size: ".card-description h6".to_string(),
            template: ".card-template".to_string(),
            insert_before: ".card-buy-credit".to_string(),
        }
    }
}

/// Text and markup hooks of the rendered fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentStyle {
    /// Class of the fragment element; also the idempotence marker.
    pub class_name: String,
    pub label: String,
    pub currency: String,
    /// Attribute holding the raw metric on the package element.
    pub metric_attr: String,
    /// Id of the injected `<style>` element.
    pub style_id: String,
    pub inject_style: bool,
}

impl Default for FragmentStyle {
    fn default() -> Self {
        Self {
            class_name: "price-per-gb-extension".to_string(),
            label: "ارزش هر گیگابایت:".to_string(),
            currency: "تومان".to_string(),
            metric_attr: "data-price-per-gb".to_string(),
            style_id: "price-per-gb-style".to_string(),
            inject_style: true,
        }
    }
}

/// Everything the annotation pipeline needs, fixed at construction time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locators: Locators,
    pub vocabulary: UnitVocabulary,
    pub fragment: FragmentStyle,
}

impl Config {
    /// Creates a builder starting from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Parses a JSON document; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks that every locator parses and the vocabulary compiles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        CompiledLocators::compile(&self.locators, &self.fragment)?;
        self.vocabulary.compile()?;
        Ok(())
    }
}

/// Parsed matchers for [`Locators`].
#[derive(Clone)]
pub struct CompiledLocators {
    pub container: Matcher,
    pub price: Matcher,
    pub size: Matcher,
    pub template: Matcher,
    pub insert_before: Matcher,
    pub fragment: Matcher,
    pub head: Matcher,
    pub style: Matcher,
    source: Locators,
}

impl std::fmt::Debug for CompiledLocators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledLocators")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl CompiledLocators {
    /// Compiles the locators plus the matchers derived from `fragment`.
    pub fn compile(locators: &Locators, fragment: &FragmentStyle) -> Result<Self, ConfigError> {
        identifier("class_name", &fragment.class_name)?;
        identifier("style_id", &fragment.style_id)?;
        Ok(Self {
            container: compile("container", &locators.container)?,
            price: compile("price", &locators.price)?,
            size: compile("size", &locators.size)?,
            template: compile("template", &locators.template)?,
            insert_before: compile("insert_before", &locators.insert_before)?,
            fragment: compile("fragment class", &format!(".{}", fragment.class_name))?,
            head: compile("head", "head")?,
            style: compile("style id", &format!("style#{}", fragment.style_id))?,
            source: locators.clone(),
        })
    }

    /// The locators these matchers were built from.
    pub fn source(&self) -> &Locators {
        &self.source
    }
}

fn identifier(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if CSS_IDENT.is_match(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            field,
            value: value.to_string(),
        })
    }
}

fn compile(field: &'static str, css: &str) -> Result<Matcher, ConfigError> {
    if css.trim().is_empty() {
        return Err(ConfigError::invalid_selector(field, css));
    }
    Matcher::new(css).map_err(|_| ConfigError::invalid_selector(field, css))
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new ConfigBuilder with default values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the package container locator.
    pub fn container(mut self, css: impl Into<String>) -> Self {
        self.config.locators.container = css.into();
        self
    }

    /// Set the price locator.
    pub fn price(mut self, css: impl Into<String>) -> Self {
        self.config.locators.price = css.into();
        self
    }

    /// Set the size locator.
    pub fn size(mut self, css: impl Into<String>) -> Self {
        self.config.locators.size = css.into();
        self
    }

    /// Set the inner template locator.
    pub fn template(mut self, css: impl Into<String>) -> Self {
        self.config.locators.template = css.into();
        self
    }

    /// Set the locator of the element the fragment goes before.
    pub fn insert_before(mut self, css: impl Into<String>) -> Self {
        self.config.locators.insert_before = css.into();
        self
    }

    /// Replace the unit vocabulary.
    pub fn vocabulary(mut self, vocabulary: UnitVocabulary) -> Self {
        self.config.vocabulary = vocabulary;
        self
    }

    /// Set the fragment label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.fragment.label = label.into();
        self
    }

    /// Set the currency word shown after the metric.
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.config.fragment.currency = currency.into();
        self
    }

    /// Enable or disable injecting the fragment stylesheet.
    pub fn inject_style(mut self, inject: bool) -> Self {
        self.config.fragment.inject_style = inject;
        self
    }

    /// Validate and return the Config.
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
