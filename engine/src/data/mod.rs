//! Data Tree
//!
//! Generic name/value tree that particle generators, control binds, keyframe
//! tracks and GUI coordinate tables load from and save to. Each node has a
//! name, a string value and ordered children. Trees persist as JSON through
//! `serde_json`.
//!
//! [`DataReader`] and [`DataWriter`] are small helpers for the common
//! "read child X into field Y if it exists" and "write field Y as child X"
//! patterns.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::math::Color;

/// One node of a data tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataNode {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DataNode>,
}

impl DataNode {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            children: Vec::new(),
        }
    }

    /// Appends an existing node as the last child.
    pub fn add(&mut self, child: DataNode) -> &mut DataNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Appends a new child and returns it for further building.
    pub fn add_new(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut DataNode {
        self.add(DataNode::new(name, value))
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, idx: usize) -> Option<&DataNode> {
        self.children.get(idx)
    }

    /// First child with this name.
    pub fn child_by_name(&self, name: &str) -> Option<&DataNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Like [`DataNode::child_by_name`], but a missing child is an error.
    pub fn require_child(&self, name: &str) -> Result<&DataNode, DataError> {
        self.child_by_name(name)
            .ok_or_else(|| DataError::MissingChild(name.to_string()))
    }

    pub fn children_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DataNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn bad_value(&self, expected: &'static str) -> DataError {
        DataError::BadValue {
            name: self.name.clone(),
            value: self.value.clone(),
            expected,
        }
    }

    pub fn value_as_f32(&self) -> Result<f32, DataError> {
        self.value.trim().parse().map_err(|_| self.bad_value("number"))
    }

    pub fn value_as_i32(&self) -> Result<i32, DataError> {
        let v = self.value.trim();
        if let Ok(i) = v.parse::<i32>() {
            return Ok(i);
        }
        // Numbers written as floats still count as integers.
        v.parse::<f32>()
            .map(|f| f as i32)
            .map_err(|_| self.bad_value("integer"))
    }

    pub fn value_as_bool(&self) -> Result<bool, DataError> {
        match self.value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "t" | "1" => Ok(true),
            "false" | "no" | "n" | "f" | "0" => Ok(false),
            _ => Err(self.bad_value("boolean")),
        }
    }

    /// "x y" or "x;y". A missing second coordinate is zero.
    pub fn value_as_point(&self) -> Result<Vec2, DataError> {
        parse_point(&self.value).ok_or_else(|| self.bad_value("point"))
    }

    pub fn value_as_color(&self) -> Result<Color, DataError> {
        Color::parse(&self.value).ok_or_else(|| self.bad_value("color"))
    }

    pub fn to_json_string(&self) -> Result<String, DataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load_file(path: &Path) -> Result<Self, DataError> {
        let text = fs::read_to_string(path)?;
        let node = Self::from_json_str(&text)?;
        log::debug!("Loaded data tree '{}' from {}", node.name, path.display());
        Ok(node)
    }

    pub fn save_file(&self, path: &Path) -> Result<(), DataError> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

/// Parses "x y", "x;y" or a single "x".
pub fn parse_point(s: &str) -> Option<Vec2> {
    let mut parts = s
        .split(|c: char| c.is_whitespace() || c == ';')
        .filter(|p| !p.is_empty());
    let x = parts.next()?.parse::<f32>().ok()?;
    let y = match parts.next() {
        Some(p) => p.parse::<f32>().ok()?,
        None => 0.0,
    };
    Some(Vec2::new(x, y))
}

pub fn point_to_string(p: Vec2) -> String {
    format!("{} {}", p.x, p.y)
}

/// Values that can be read from and written to a node's string value.
pub trait DataValue: Sized {
    fn from_node(node: &DataNode) -> Result<Self, DataError>;
    fn to_value_string(&self) -> String;
}

impl DataValue for f32 {
    fn from_node(node: &DataNode) -> Result<Self, DataError> {
        node.value_as_f32()
    }
    fn to_value_string(&self) -> String {
        self.to_string()
    }
}

impl DataValue for i32 {
    fn from_node(node: &DataNode) -> Result<Self, DataError> {
        node.value_as_i32()
    }
    fn to_value_string(&self) -> String {
        self.to_string()
    }
}

impl DataValue for usize {
    fn from_node(node: &DataNode) -> Result<Self, DataError> {
        node.value_as_i32().map(|i| i.max(0) as usize)
    }
    fn to_value_string(&self) -> String {
        self.to_string()
    }
}

impl DataValue for bool {
    fn from_node(node: &DataNode) -> Result<Self, DataError> {
        node.value_as_bool()
    }
    fn to_value_string(&self) -> String {
        self.to_string()
    }
}

impl DataValue for String {
    fn from_node(node: &DataNode) -> Result<Self, DataError> {
        Ok(node.value.clone())
    }
    fn to_value_string(&self) -> String {
        self.clone()
    }
}

impl DataValue for Vec2 {
    fn from_node(node: &DataNode) -> Result<Self, DataError> {
        node.value_as_point()
    }
    fn to_value_string(&self) -> String {
        point_to_string(*self)
    }
}

impl DataValue for Color {
    fn from_node(node: &DataNode) -> Result<Self, DataError> {
        node.value_as_color()
    }
    fn to_value_string(&self) -> String {
        self.to_data_string()
    }
}

/// Reads named children into existing fields.
///
/// A field is only overwritten when its child exists and parses. Children
/// with malformed values are logged and skipped.
pub struct DataReader<'a> {
    node: Option<&'a DataNode>,
}

impl<'a> DataReader<'a> {
    pub fn new(node: Option<&'a DataNode>) -> Self {
        Self { node }
    }

    /// Returns true if the target was written.
    pub fn set<T: DataValue>(&self, name: &str, target: &mut T) -> bool {
        let Some(child) = self.node.and_then(|n| n.child_by_name(name)) else {
            return false;
        };
        match T::from_node(child) {
            Ok(v) => {
                *target = v;
                true
            }
            Err(e) => {
                log::error!("{e}");
                false
            }
        }
    }

    pub fn set_f32(&self, name: &str, target: &mut f32) -> bool {
        self.set(name, target)
    }

    pub fn set_bool(&self, name: &str, target: &mut bool) -> bool {
        self.set(name, target)
    }

    pub fn set_point(&self, name: &str, target: &mut Vec2) -> bool {
        self.set(name, target)
    }

    pub fn set_string(&self, name: &str, target: &mut String) -> bool {
        self.set(name, target)
    }

    /// Reads an angle stored in degrees into a radians field.
    pub fn set_degrees(&self, name: &str, target: &mut f32) -> bool {
        let mut deg = target.to_degrees();
        if self.set(name, &mut deg) {
            *target = deg.to_radians();
            true
        } else {
            false
        }
    }
}

/// Writes fields as name/value children.
pub struct DataWriter<'a> {
    node: &'a mut DataNode,
}

impl<'a> DataWriter<'a> {
    pub fn new(node: &'a mut DataNode) -> Self {
        Self { node }
    }

    pub fn write<T: DataValue>(&mut self, name: &str, value: &T) {
        self.node.add_new(name, value.to_value_string());
    }

    pub fn write_degrees(&mut self, name: &str, radians: f32) {
        self.write(name, &radians.to_degrees());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataNode {
        let mut root = DataNode::new("gen", "");
        let emission = root.add_new("emission", "");
        emission.add_new("number", "3");
        emission.add_new("interval", "0.5");
        emission.add_new("evenly_spread", "true");
        root.add_new("linear_speed_deviation", "4 -2");
        root.add_new("number", "oops");
        root
    }

    #[test]
    fn test_child_lookup() {
        let root = sample();
        assert_eq!(root.child_count(), 3);
        assert!(root.child_by_name("emission").is_some());
        assert!(root.child_by_name("missing").is_none());
        assert!(matches!(
            root.require_child("missing"),
            Err(DataError::MissingChild(_))
        ));
    }

    #[test]
    fn test_coercions() {
        let root = sample();
        let em = root.child_by_name("emission").unwrap();
        assert_eq!(em.child_by_name("number").unwrap().value_as_i32().unwrap(), 3);
        assert_eq!(em.child_by_name("interval").unwrap().value_as_f32().unwrap(), 0.5);
        assert!(em.child_by_name("evenly_spread").unwrap().value_as_bool().unwrap());
        assert_eq!(
            root.child_by_name("linear_speed_deviation").unwrap().value_as_point().unwrap(),
            Vec2::new(4.0, -2.0)
        );
        assert_eq!(parse_point("1;2"), Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_reader_only_overwrites_valid_children() {
        let root = sample();
        let reader = DataReader::new(Some(&root));
        let mut number = 7i32;
        assert!(!reader.set("number", &mut number));
        assert_eq!(number, 7);

        let mut missing = 1.5f32;
        assert!(!reader.set_f32("nothing", &mut missing));
        assert_eq!(missing, 1.5);

        let none = DataReader::new(None);
        assert!(!none.set_f32("anything", &mut missing));
    }

    #[test]
    fn test_reader_degrees() {
        let mut root = DataNode::new("root", "");
        root.add_new("angle", "90");
        let mut angle = 0.0f32;
        DataReader::new(Some(&root)).set_degrees("angle", &mut angle);
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_json_round_trip() {
        let root = sample();
        let json = root.to_json_string().unwrap();
        let back = DataNode::from_json_str(&json).unwrap();
        assert_eq!(back, root);
    }

    #[test]
    fn test_writer() {
        let mut node = DataNode::new("out", "");
        let mut w = DataWriter::new(&mut node);
        w.write("friction", &2.5f32);
        w.write("shift", &Vec2::new(1.0, 2.0));
        w.write("absolute", &true);
        assert_eq!(node.child_by_name("friction").unwrap().value, "2.5");
        assert_eq!(node.child_by_name("shift").unwrap().value, "1 2");
        assert_eq!(node.child_by_name("absolute").unwrap().value, "true");
    }
}
