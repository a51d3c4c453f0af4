//! Named default parameter sets and the merge rule applied to them.
//!
//! Enqueue and subtitle export both take a large set of optional knobs. The
//! client starts from the defaults below, lets the caller override any key,
//! and never sends a key whose final value is `null`.

use serde_json::{json, Map, Value};

/// Caller-supplied parameter overrides, keyed by the API's parameter names.
pub type Options = Map<String, Value>;

/// Defaults sent with `projects/{id}/enqueue`.
pub fn enqueue_defaults() -> Options {
    to_options(json!({
        "Lang": "cs-CZ",
        "WithPPC": true,
        "WithVAD": true,
        "WithPunctuation": true,
        "SaveTrsx": true,
        "WithDiarization": true,
        "DiarizationSpeakerCount": null,
        "UseReplacementRules": true,
        "ReplacementRulesProfileId": null,
        "WithSpeakerIdentification": false,
        "SpeakerIdentificationThreshold": null,
        "TranscriptionProfile": "default",
        "WithCapitalization": true,
        "WithNumberConversion": true,
        "WithKeywords": false,
        "KeywordsListId": null,
        "SendEmailNotification": false,
        "Priority": null,
        "CallbackUrl": null
    }))
}

/// Defaults sent with `projects/{id}/export/subtitles`.
pub fn subtitle_defaults() -> Options {
    to_options(json!({
        "SubtitlesVariant": "Default",
        "MaxLineCount": 2,
        "MaxLineLength": 42,
        "MinCaptionDuration": 1.0,
        "MaxCaptionDuration": 7.0,
        "MinGapDuration": 0.08,
        "AutoFillGaps": true,
        "FillGapsThreshold": 0.5,
        "SpeakerSignPlacement": "UtteranceStart",
        "SpeakerSign": "- ",
        "UseSpeakerName": false,
        "PauseBetweenCaptions": 0.0,
        "MaxCharactersPerSecond": null,
        "SplitOnPunctuation": true,
        "SplitOnSpeakerChange": true,
        "KeepWordsTogether": true,
        "RemoveNoiseTags": true,
        "RemoveFillerWords": false,
        "Capitalize": true,
        "Normalize": true,
        "RightToLeft": false,
        "Encoding": "utf-8",
        "FrameRate": null,
        "TimeOffset": 0.0,
        "StartTimecode": null,
        "IncludeBom": false,
        "LineEnding": "LF",
        "Template": null
    }))
}

/// Fixed query for plain project export.
pub(crate) fn project_export_defaults() -> Options {
    to_options(json!({
        "WithTimestamps": false,
        "RightToLeft": false,
        "Normalize": true
    }))
}

/// Overlays `overrides` on `defaults` (caller wins) and drops every null-valued key.
pub fn merge(defaults: Options, overrides: Options) -> Options {
    let mut merged = defaults;
    merged.extend(overrides);
    merged.retain(|_, value| !value.is_null());
    merged
}

/// Renders parameters as query pairs. Nulls are skipped.
pub(crate) fn to_query(params: &Options) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => other.to_string(),
            };
            Some((key.clone(), rendered))
        })
        .collect()
}

/// Parses a `KEY=VALUE` override. The value is read as JSON when it parses, else as text.
pub fn parse_override(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn to_options(value: Value) -> Options {
    match value {
        Value::Object(map) => map,
        _ => Options::new(),
    }
}
