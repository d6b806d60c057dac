//! Prompt text sent to the model collaborator.

use crate::types::DeckRequest;

/// Schema description and formatting rules appended to every prompt.
const SCHEMA_HINT: &str = r#"Return ONLY valid JSON (no markdown fences). Schema:

{
  "slides": [
    // choose appropriate slide types and include image_query when helpful
    { "type": "section", "heading": "string", "blurb": "string (optional)" },
    { "type": "bullets", "title": "string", "bullets": ["string", "..."], "image_query": "string (optional)" },
    { "type": "two-column", "title": "string", "left": ["string", "..."], "right": ["string", "..."], "image_query": "string (optional)" },
    { "type": "image-hero", "caption": "string (optional)", "image_query": "string" }
  ],
  "meta": { "title": "string", "subtitle": "string (optional)" }
}

Rules:
- Aim for the requested slide count (±1 ok).
- Bullets short (<=50 words).
- Include image_query on ~40–60% slides where a visual helps.
- One opener (section), 3–5 bullets slides, 1 two-column, 1 summary."#;

/// Build the outline prompt for a request.
pub fn build_prompt(request: &DeckRequest) -> String {
    format!(
        "You are a senior presentation strategist.\n\
         Create a concise deck outline with tasteful visuals.\n\
         \n\
         Topic: {topic}\n\
         Audience: {audience}\n\
         Tone: {tone}\n\
         Visual: {style}\n\
         Desired Slides: {count}\n\
         \n\
         Include helpful image ideas as 'image_query' text (e.g., 'data center racks', \
         'AI workflow diagram', 'wind turbines at sunset').\n\
         \n\
         Main deck title: \"{title}\"\n\
         Subtitle: \"{subtitle}\"\n\
         \n\
         {schema}",
        topic = request.topic,
        audience = request.audience,
        tone = request.tone,
        style = request.visual_style,
        count = request.slide_count,
        title = request.display_title(),
        subtitle = request.subtitle.as_deref().unwrap_or(""),
        schema = SCHEMA_HINT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_request() {
        let request = DeckRequest::new("Generative AI for Product Teams")
            .unwrap()
            .with_audience("PMs")
            .with_tone("Playful")
            .with_visual_style("Bold")
            .with_slide_count(12)
            .with_subtitle("A field guide");
        let prompt = build_prompt(&request);

        assert!(prompt.contains("Topic: Generative AI for Product Teams"));
        assert!(prompt.contains("Audience: PMs"));
        assert!(prompt.contains("Tone: Playful"));
        assert!(prompt.contains("Visual: Bold"));
        assert!(prompt.contains("Desired Slides: 12"));
        assert!(prompt.contains("Main deck title: \"Generative AI for Product Teams\""));
        assert!(prompt.contains("Subtitle: \"A field guide\""));
    }

    #[test]
    fn test_prompt_carries_schema_and_no_fence_rule() {
        let request = DeckRequest::new("Solar").unwrap().with_title("Sunny Days");
        let prompt = build_prompt(&request);

        assert!(prompt.contains("no markdown fences"));
        assert!(prompt.contains("\"type\": \"two-column\""));
        assert!(prompt.contains("\"meta\""));
        assert!(prompt.contains("Main deck title: \"Sunny Days\""));
        assert!(prompt.contains("Subtitle: \"\""));
    }
}
