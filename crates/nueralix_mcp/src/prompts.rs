use rmcp::model::{GetPromptResult, PromptMessage, PromptMessageRole};

pub fn analyze_health_data_prompt(focus: &str) -> GetPromptResult {
    GetPromptResult::new(vec![PromptMessage::new_text(
            PromptMessageRole::User,
            format!(
                "Analyze my health data for today with a focus on {focus}.\n\nInclude:\n1. Daily steps and how they compare with yesterday\n2. Latest heart rate reading\n3. Last sleep session length\n4. Active calories burned so far\n5. One or two concrete suggestions for the rest of the day\n\nUse get_health_snapshot for today's metrics and get_weekly_activity for the week's pattern. If a metric shows \"--\", say that no data was recorded instead of guessing. If the snapshot carries a notice asking for permission, suggest request_health_permissions first."
            ),
        )])
    .with_description(format!("Analysis of today's health data, focused on {focus}"))
}

pub fn surprise_me_prompt(topic: Option<&str>) -> GetPromptResult {
    let scope = match topic {
        Some(t) => format!(" Keep it about {t}."),
        None => String::new(),
    };
    GetPromptResult::new(vec![PromptMessage::new_text(
            PromptMessageRole::User,
            format!(
                "Surprise me with one interesting, non-obvious observation about my health today.{scope}\n\nUse get_health_snapshot and get_weekly_activity, pick the single most interesting pattern or contrast, and explain it in two or three friendly sentences. Skip metrics that show \"--\"."
            ),
        )])
    .with_description("An unexpected insight from today's health data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_prompt_mentions_focus_and_tools() {
        let p = analyze_health_data_prompt("sleep");
        assert_eq!(p.messages.len(), 1);
        assert!(
            p.description
                .as_deref()
                .is_some_and(|d| d.contains("sleep"))
        );
    }

    #[test]
    fn surprise_prompt_has_single_user_message() {
        let p = surprise_me_prompt(None);
        assert_eq!(p.messages.len(), 1);
        assert!(p.description.is_some());
    }
}
