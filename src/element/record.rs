use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    Color, Element, ElementId, ElementKind, ShapeKind, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE,
    DEFAULT_SHAPE_COLOR, DEFAULT_TEXT_COLOR, MIN_ELEMENT_SIZE, TEXT_BOX_PADDING,
};

/// Size given to a stored image that carries no dimensions.
const DEFAULT_IMAGE_SIZE: f32 = 200.0;

/// Errors raised when a stored element record can't be turned into an [`Element`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    #[error("unknown element type {0:?}")]
    UnknownKind(String),
    #[error("{kind} element is missing `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    #[error("element {0} has a non-finite coordinate")]
    NonFinite(ElementId),
}

/// Flat, JSON-facing form of an [`Element`], as found in `jsonData.elements`.
///
/// Every kind shares one record with optional kind-specific fields, matching
/// what the web editor writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    #[serde(default)]
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f32>,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl TryFrom<ElementRecord> for Element {
    type Error = ElementError;

    fn try_from(record: ElementRecord) -> Result<Self, Self::Error> {
        let coords = [record.x, record.y, record.rotation];
        let sizes = [record.w, record.h, record.font_size];
        if coords.iter().any(|v| !v.is_finite())
            || sizes.iter().flatten().any(|v| !v.is_finite())
        {
            return Err(ElementError::NonFinite(record.id));
        }

        let (kind, default_size) = match record.kind.as_str() {
            "text" => {
                let text = record.text.ok_or(ElementError::MissingField {
                    kind: "text",
                    field: "text",
                })?;
                let font_size = record.font_size.unwrap_or(DEFAULT_FONT_SIZE);
                // Rough advance for records written without a width.
                let width = text.chars().count() as f32 * font_size * 0.6;
                (
                    ElementKind::Text {
                        text,
                        font_size,
                        font_family: record
                            .font_family
                            .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_owned()),
                        color: Color::new(
                            record.color.unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_owned()),
                        ),
                    },
                    (width.max(MIN_ELEMENT_SIZE), font_size + TEXT_BOX_PADDING),
                )
            }
            "image" => {
                let src = record.src.ok_or(ElementError::MissingField {
                    kind: "image",
                    field: "src",
                })?;
                (
                    ElementKind::Image { src },
                    (DEFAULT_IMAGE_SIZE, DEFAULT_IMAGE_SIZE),
                )
            }
            tag => {
                let shape = ShapeKind::from_tag(tag)
                    .ok_or_else(|| ElementError::UnknownKind(tag.to_owned()))?;
                let size = shape.default_size();
                (
                    ElementKind::Shape {
                        shape,
                        color: Color::new(
                            record.color.unwrap_or_else(|| DEFAULT_SHAPE_COLOR.to_owned()),
                        ),
                    },
                    (size.x, size.y),
                )
            }
        };

        Ok(Element {
            id: record.id,
            x: record.x,
            y: record.y,
            w: record.w.unwrap_or(default_size.0),
            h: record.h.unwrap_or(default_size.1),
            rotation: record.rotation,
            kind,
        })
    }
}

impl From<Element> for ElementRecord {
    fn from(element: Element) -> Self {
        let kind = element.kind_name().to_owned();
        let mut record = ElementRecord {
            id: element.id,
            kind,
            x: element.x,
            y: element.y,
            w: Some(element.w),
            h: Some(element.h),
            rotation: element.rotation,
            color: None,
            text: None,
            font_size: None,
            font_family: None,
            src: None,
        };
        match element.kind {
            ElementKind::Shape { color, .. } => {
                record.color = Some(color.as_str().to_owned());
            }
            ElementKind::Text {
                text,
                font_size,
                font_family,
                color,
            } => {
                record.text = Some(text);
                record.font_size = Some(font_size);
                record.font_family = Some(font_family);
                record.color = Some(color.as_str().to_owned());
            }
            ElementKind::Image { src } => record.src = Some(src),
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_height_defaults_from_font_size() {
        let element: Element = serde_json::from_str(
            r##"{"id":4,"type":"text","x":100,"y":100,"w":80,"text":"Hello","fontSize":30,"fontFamily":"Arial","color":"#111"}"##,
        )
        .unwrap();
        assert_eq!(element.h, 38.0);
        assert_eq!(element.w, 80.0);
    }

    #[test]
    fn unknown_kinds_are_rejected() {
        let result = serde_json::from_str::<Element>(r#"{"id":1,"type":"star","x":0,"y":0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn images_need_a_source() {
        let record: ElementRecord =
            serde_json::from_str(r#"{"id":1,"type":"image","x":0,"y":0}"#).unwrap();
        assert_eq!(
            Element::try_from(record),
            Err(ElementError::MissingField {
                kind: "image",
                field: "src"
            })
        );
    }

    #[test]
    fn shapes_serialize_with_type_tag() {
        let element = super::super::factory::create_rectangle(7, 300.0, 100.0, 120.0, 80.0, "#4f46e5");
        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["type"], "rectangle");
        assert_eq!(value["color"], "#4f46e5");
        assert!(value.get("fontSize").is_none());
    }
}
