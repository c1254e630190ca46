use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const IMAGE_ALT_FALLBACK: &str = "Lesson Image";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub content: Vec<ContentBlock>,
}

/// A single piece of lesson content, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text {
        value: String,
    },
    Image {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Code {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    Video {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    /// Any block type this app does not know how to show.
    #[serde(other)]
    Unsupported,
}

/// What a block turns into on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBlock {
    Paragraph(String),
    Figure {
        src: String,
        alt: String,
        caption: Option<String>,
    },
    CodeSample {
        language: Option<String>,
        source: String,
    },
    Video {
        src: String,
        caption: Option<String>,
    },
}

impl ContentBlock {
    pub fn render(&self) -> Option<RenderedBlock> {
        match self {
            Self::Text { value } => Some(RenderedBlock::Paragraph(value.clone())),
            Self::Image { value, caption } => {
                let caption = visible_caption(caption);
                Some(RenderedBlock::Figure {
                    src: value.clone(),
                    alt: caption
                        .clone()
                        .unwrap_or_else(|| IMAGE_ALT_FALLBACK.to_string()),
                    caption,
                })
            }
            Self::Code { value, language } => Some(RenderedBlock::CodeSample {
                language: language.clone(),
                source: value.clone(),
            }),
            Self::Video { value, caption } => Some(RenderedBlock::Video {
                src: value.clone(),
                caption: visible_caption(caption),
            }),
            Self::Unsupported => None,
        }
    }
}

// An empty caption is treated the same as a missing one.
fn visible_caption(caption: &Option<String>) -> Option<String> {
    caption.as_ref().filter(|c| !c.is_empty()).cloned()
}

impl Lesson {
    /// One entry per block that can be shown, in the order they appear.
    pub fn rendered_blocks(&self) -> Vec<RenderedBlock> {
        self.content.iter().filter_map(ContentBlock::render).collect()
    }
}

/// The lesson shown on every lesson route.
pub static INTRO_LESSON: LazyLock<Lesson> = LazyLock::new(|| Lesson {
    id: 1,
    title: "Understanding HTML & CSS".to_string(),
    description:
        "Learn the basics of HTML & CSS to build the foundation for modern web development."
            .to_string(),
    image_url: "https://miro.medium.com/v2/resize:fit:792/1*lJ32Bl-lHWmNMUSiSq17gQ.png"
        .to_string(),
    content: vec![
        ContentBlock::Text {
            value: "HTML stands for HyperText Markup Language. It is the standard markup language for creating web pages.".to_string(),
        },
        ContentBlock::Image {
            value: "https://your-image-url.com/example-diagram.png".to_string(),
            caption: Some("Example of an HTML structure".to_string()),
        },
        ContentBlock::Text {
            value: "CSS stands for Cascading Style Sheets. It is used to style the layout of web pages.".to_string(),
        },
        ContentBlock::Code {
            language: Some("html".to_string()),
            value: "<!DOCTYPE html>\n<html>\n<head>\n  <title>My First HTML</title>\n</head>\n<body>\n  <h1>Hello World</h1>\n  <p>This is a paragraph.</p>\n</body>\n</html>".to_string(),
        },
        ContentBlock::Video {
            value: "https://your-video-url.com/intro-html-css.mp4".to_string(),
            caption: Some("Introduction to HTML & CSS".to_string()),
        },
    ],
});

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED_LESSON: &str = r#"{
        "id": 7,
        "title": "Mixed",
        "description": "One of everything",
        "imageUrl": "https://example.com/cover.png",
        "content": [
            { "type": "text", "value": "first" },
            { "type": "quiz", "value": "what is 2 + 2?", "answers": ["4"] },
            { "type": "image", "value": "https://example.com/a.png" },
            { "type": "code", "language": "rust", "value": "fn main() {}" },
            { "type": "video", "value": "https://example.com/v.mp4", "caption": "" }
        ]
    }"#;

    #[test]
    fn unknown_block_types_render_nothing() {
        let lesson: Lesson = serde_json::from_str(MIXED_LESSON).unwrap();
        assert_eq!(lesson.content.len(), 5);
        assert_eq!(lesson.content[1], ContentBlock::Unsupported);

        let rendered = lesson.rendered_blocks();
        assert_eq!(
            rendered,
            vec![
                RenderedBlock::Paragraph("first".to_string()),
                RenderedBlock::Figure {
                    src: "https://example.com/a.png".to_string(),
                    alt: "Lesson Image".to_string(),
                    caption: None,
                },
                RenderedBlock::CodeSample {
                    language: Some("rust".to_string()),
                    source: "fn main() {}".to_string(),
                },
                RenderedBlock::Video {
                    src: "https://example.com/v.mp4".to_string(),
                    caption: None,
                },
            ]
        );
    }

    #[test]
    fn intro_lesson_renders_every_block_in_order() {
        let rendered = INTRO_LESSON.rendered_blocks();
        assert_eq!(rendered.len(), INTRO_LESSON.content.len());
        assert!(matches!(rendered[0], RenderedBlock::Paragraph(_)));
        assert!(matches!(
            &rendered[1],
            RenderedBlock::Figure { alt, caption: Some(caption), .. }
                if alt == "Example of an HTML structure" && caption == alt
        ));
        assert!(matches!(rendered[2], RenderedBlock::Paragraph(_)));
        assert!(matches!(
            &rendered[3],
            RenderedBlock::CodeSample { language: Some(lang), .. } if lang == "html"
        ));
        assert!(matches!(rendered[4], RenderedBlock::Video { .. }));
    }

    #[test]
    fn lesson_serializes_with_camel_case_image_url() {
        let json = serde_json::to_value(&*INTRO_LESSON).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert_eq!(json["content"][3]["type"], "code");
        assert_eq!(json["content"][3]["language"], "html");
    }
}
