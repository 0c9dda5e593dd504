use crate::core::scoring::ScoreResult;
use crate::domain::model::{AssessmentKind, ClinicalInput};
use crate::domain::profile::{HealthProfile, LifestyleInput};

const DISCLAIMER: &str = "Remember to note that this is for informational purposes and not a substitute for professional medical advice.";

fn explanation_outline(kind: AssessmentKind) -> [&'static str; 3] {
    match kind {
        AssessmentKind::Diabetes => [
            "What this prediction means",
            "Key risk factors observed",
            "General health recommendations",
        ],
        AssessmentKind::Heart => [
            "What this prediction means",
            "Key cardiovascular risk factors observed",
            "General heart health recommendations",
        ],
        AssessmentKind::Parkinsons => [
            "What this prediction means",
            "How voice analysis relates to Parkinson's disease",
            "General recommendations for neurological health",
        ],
    }
}

fn data_label(kind: AssessmentKind) -> &'static str {
    match kind {
        AssessmentKind::Parkinsons => "Voice analysis data",
        AssessmentKind::Diabetes | AssessmentKind::Heart => "Patient data",
    }
}

pub fn clinical_prompt<I: ClinicalInput>(
    input: &I,
    diagnosis: &str,
    score: Option<&ScoreResult>,
) -> String {
    let kind = input.kind();
    let [first, second, third] = explanation_outline(kind);
    let score_line = score
        .map(|s| format!("- Heuristic risk score: {}/{} ({})\n", s.score, s.max, s.level))
        .unwrap_or_default();
    format!(
        "Based on the following {} prediction results:\n\
         - Prediction: {}\n\
         {}\
         - {}: {}\n\n\
         Please provide a brief medical explanation (max 3 paragraphs) about:\n\
         1. {}\n\
         2. {}\n\
         3. {}\n\n\
         {}",
        kind,
        diagnosis,
        score_line,
        data_label(kind),
        input.summary(),
        first,
        second,
        third,
        DISCLAIMER
    )
}

pub fn lifestyle_prompt(input: &LifestyleInput, score: &ScoreResult) -> String {
    let factors = if score.breakdown.is_empty() {
        "none".to_string()
    } else {
        score
            .breakdown
            .iter()
            .map(|hit| format!("{} (+{})", hit.label, hit.points))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "A lifestyle self-assessment produced a risk score of {}/{} ({} risk).\n\
         - Answers: {}\n\
         - Contributing factors: {}\n\n\
         Please explain in at most 3 short paragraphs what the score suggests, which factors matter most, \
         and practical changes that would lower it.\n\n\
         {}",
        score.score,
        score.max,
        score.level,
        input.summary(),
        factors,
        DISCLAIMER
    )
}

pub fn dietary_prompt(profile: &HealthProfile) -> String {
    format!(
        "As a nutrition expert, create a personalized daily meal plan for someone with this profile:\n\
         {}\n\n\
         Please provide:\n\
         1. A complete daily meal plan (breakfast, lunch, dinner, 2 snacks)\n\
         2. Explanation of why this plan works for their goals\n\
         3. Important nutritional considerations\n\
         4. Estimated daily calorie range\n\n\
         Keep the response practical and actionable, around 300-400 words.",
        profile.describe()
    )
}

pub fn fitness_prompt(profile: &HealthProfile) -> String {
    format!(
        "As a fitness expert, create a personalized weekly exercise routine for someone with this profile:\n\
         {}\n\n\
         Please provide:\n\
         1. A weekly workout schedule with specific exercises\n\
         2. Duration and intensity recommendations\n\
         3. Progression guidelines\n\
         4. Important safety considerations\n\n\
         Keep the response practical and actionable, around 300-400 words.",
        profile.describe()
    )
}

pub fn health_tips_prompt(profile: &HealthProfile) -> String {
    format!(
        "Based on this health profile:\n\
         {}\n\n\
         Provide 5 quick, practical health tips specifically tailored to this person's goals and lifestyle. \
         Keep each tip to 1-2 sentences.",
        profile.describe()
    )
}
