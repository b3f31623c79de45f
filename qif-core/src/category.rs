use serde::Serialize;
use typed_builder::TypedBuilder;

/// Separator between the levels of a category name: `Auto:Fuel:Premium`.
pub const LEVEL_SEPARATOR: char = ':';

/// Represents an entry of the `!Type:Cat` category list.
///
/// ```text
/// !Type:Cat
/// NAuto:Fuel
/// DGas for the car
/// E
/// ^
/// ```
///
/// A category name holds up to three levels.  Anything past the second separator stays in
/// `sub_sub_category` as written.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, TypedBuilder)]
pub struct Category {
    /// Top level of the category name.
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,

    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_sub_category: Option<String>,

    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Set by an `I` line.
    #[builder(default)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub income: bool,

    /// Set by an `E` line.
    #[builder(default)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub expense: bool,
}

impl Category {
    /// Splits `path` on the first two separators and stores the levels that are present.  Levels
    /// missing from `path` keep whatever value they already had.
    pub fn set_name_path(&mut self, path: &str) {
        let mut levels = path.splitn(3, LEVEL_SEPARATOR);
        if let Some(name) = levels.next() {
            self.name = Some(name.to_string());
        }
        if let Some(sub) = levels.next() {
            self.sub_category = Some(sub.to_string());
        }
        if let Some(sub_sub) = levels.next() {
            self.sub_sub_category = Some(sub_sub.to_string());
        }
    }
}
