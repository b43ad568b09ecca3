//! JSON boundary for hosts (web view bridge, bots, the CLI).
//!
//! Every call returns an [`ApiResponse`] envelope serialized to a string;
//! failures travel through the same envelope with a stable error code.

use crate::error::GameError;
use crate::identity::PlayerIdentity;
use crate::leaderboard::LeaderboardEntry;
use crate::level::{PuzzleFamily, PuzzleLevel};
use crate::localization::Locale;
use crate::progress::{
    AdSettlement, HintReveal, ProgressEngine, ProgressStats, Progression, SkipOutcome,
    SubmitOutcome,
};
use crate::shop::{ShopItem, ShopOrder};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// API version for schema compatibility
pub const API_VERSION: &str = "v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub schema_version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub details: Option<HashMap<String, serde_json::Value>>,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self { code: code.to_string(), message: message.to_string(), details: None }
    }

    pub fn with_details(code: &str, message: &str, details: HashMap<String, serde_json::Value>) -> Self {
        Self { code: code.to_string(), message: message.to_string(), details: Some(details) }
    }
}

impl From<&GameError> for ApiError {
    fn from(error: &GameError) -> Self {
        match error {
            GameError::InsufficientBalance { needed, available } => {
                let mut details = HashMap::new();
                details.insert("needed".to_string(), serde_json::json!(needed));
                details.insert("available".to_string(), serde_json::json!(available));
                Self::with_details(error.code(), &error.to_string(), details)
            }
            GameError::InvalidLevelRange { level, max } => {
                let mut details = HashMap::new();
                details.insert("level".to_string(), serde_json::json!(level));
                details.insert("max".to_string(), serde_json::json!(max));
                Self::with_details(error.code(), &error.to_string(), details)
            }
            _ => Self::new(error.code(), &error.to_string()),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A level as shown to the player. The canonical answer stays server side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelView {
    pub level_number: u32,
    pub title: String,
    pub family: PuzzleFamily,
    pub icon: String,
    /// Render right-to-left (Arabic locale).
    pub rtl: bool,
    pub question_text: String,
    pub question_text_ar: String,
    pub options: Vec<String>,
    pub options_ar: Vec<String>,
    pub hint_available: bool,
    pub difficulty_tier: u8,
    pub difficulty_badge: String,
    pub reward: f64,
    pub estimated_time_seconds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrambled: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", content = "level", rename_all = "camelCase")]
pub enum ProgressionView {
    Playing(Box<LevelView>),
    Complete { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub item: ShopItem,
    pub recipient: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaderboardRequest {
    #[serde(default)]
    pub identity: Option<PlayerIdentity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub correct: bool,
    pub needs_ad: bool,
    pub amount: f64,
    pub duplicate: bool,
    pub attempts: u32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    pub settled: bool,
    pub amount: f64,
    pub balance: f64,
    pub message: Option<String>,
    pub next: ProgressionView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintResponse {
    pub hint: String,
    pub hint_ar: String,
    pub cost: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipResponse {
    pub skipped_level: u32,
    pub cost: f64,
    pub balance: f64,
    pub message: String,
    pub next: ProgressionView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub rank: usize,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// JSON facade over a [`ProgressEngine`], rendering text in one locale.
pub struct GameApi<S: KeyValueStore> {
    engine: ProgressEngine<S>,
    locale: Locale,
}

impl<S: KeyValueStore> GameApi<S> {
    pub fn new(engine: ProgressEngine<S>, locale: Locale) -> Self {
        Self { engine, locale }
    }

    pub fn engine(&self) -> &ProgressEngine<S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ProgressEngine<S> {
        &mut self.engine
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn level_view(&self, level: &PuzzleLevel) -> LevelView {
        LevelView {
            level_number: level.level_number,
            title: level.title.get(self.locale).to_string(),
            family: level.family,
            icon: level.family.icon().to_string(),
            rtl: self.locale.is_rtl(),
            question_text: level.question.en.clone(),
            question_text_ar: level.question.ar.clone(),
            options: level.options_en().into_iter().map(str::to_string).collect(),
            options_ar: level.options_ar().into_iter().map(str::to_string).collect(),
            hint_available: level.hint.is_some(),
            difficulty_tier: level.difficulty_tier,
            difficulty_badge: self.engine.difficulty_badge(level.difficulty_tier, self.locale),
            reward: level.reward,
            estimated_time_seconds: level.estimated_time_seconds,
            scrambled: level.scrambled.clone(),
        }
    }

    fn progression_view(&self, progression: &Progression) -> ProgressionView {
        match progression {
            Progression::Playing(level) => ProgressionView::Playing(Box::new(self.level_view(level))),
            Progression::Complete => ProgressionView::Complete {
                message: self.text("feedback-game-complete", None),
            },
        }
    }

    fn text(&self, key: &str, arg: Option<(&str, String)>) -> String {
        self.engine.message(key, arg).get(self.locale).to_string()
    }

    pub fn current_level_json(&mut self) -> String {
        let response = match self.engine.progression() {
            Ok(progression) => ApiResponse::success(self.progression_view(&progression)),
            Err(e) => ApiResponse::error(ApiError::from(&e)),
        };
        response.to_json()
    }

    pub fn submit_answer_json(&mut self, request_json: &str) -> String {
        let request: AnswerRequest = match serde_json::from_str(request_json) {
            Ok(req) => req,
            Err(e) => return invalid_request::<AnswerResponse>(e),
        };

        let response = match self.engine.submit_answer(&request.answer) {
            Ok(outcome) => ApiResponse::success(self.answer_response(outcome)),
            Err(e) => ApiResponse::error(ApiError::from(&e)),
        };
        response.to_json()
    }

    fn answer_response(&self, outcome: SubmitOutcome) -> AnswerResponse {
        AnswerResponse {
            correct: outcome.correct,
            needs_ad: outcome.needs_ad,
            amount: outcome.amount,
            duplicate: outcome.duplicate,
            attempts: outcome.attempts,
            message: outcome.message.get(self.locale).to_string(),
        }
    }

    pub fn complete_ad_json(&mut self) -> String {
        let response = match self.engine.complete_ad_and_advance() {
            Ok(settlement) => ApiResponse::success(self.settlement_response(settlement)),
            Err(e) => ApiResponse::error(ApiError::from(&e)),
        };
        response.to_json()
    }

    fn settlement_response(&self, settlement: AdSettlement) -> SettlementResponse {
        let message = settlement.settled.then(|| {
            self.text("feedback-reward-settled", Some(("amount", format!("{:.2}", settlement.amount))))
        });
        SettlementResponse {
            settled: settlement.settled,
            amount: settlement.amount,
            balance: settlement.balance,
            message,
            next: self.progression_view(&settlement.next),
        }
    }

    pub fn hint_json(&mut self) -> String {
        let response = match self.engine.use_hint() {
            Ok(HintReveal { hint, cost, balance }) => {
                ApiResponse::success(HintResponse { hint: hint.en, hint_ar: hint.ar, cost, balance })
            }
            Err(e) => ApiResponse::error(self.spend_error(&e)),
        };
        response.to_json()
    }

    pub fn skip_json(&mut self) -> String {
        let response = match self.engine.skip_level() {
            Ok(outcome) => ApiResponse::success(self.skip_response(outcome)),
            Err(e) => ApiResponse::error(self.spend_error(&e)),
        };
        response.to_json()
    }

    fn skip_response(&self, outcome: SkipOutcome) -> SkipResponse {
        SkipResponse {
            skipped_level: outcome.skipped_level,
            cost: outcome.cost,
            balance: outcome.balance,
            message: self.text("feedback-level-skipped", Some(("cost", format!("{:.2}", outcome.cost)))),
            next: self.progression_view(&outcome.next),
        }
    }

    /// Spend failures carry the localized player-facing message.
    fn spend_error(&self, error: &GameError) -> ApiError {
        let mut api_error = ApiError::from(error);
        match error {
            GameError::InsufficientBalance { needed, .. } => {
                api_error.message =
                    self.text("feedback-insufficient-balance", Some(("cost", format!("{:.2}", needed))));
            }
            GameError::NoHint { .. } => api_error.message = self.text("feedback-no-hint", None),
            GameError::GameComplete => api_error.message = self.text("feedback-game-complete", None),
            _ => {}
        }
        api_error
    }

    pub fn reset_json(&mut self) -> String {
        let response = match self.engine.reset_game() {
            Ok(()) => ApiResponse::success(self.engine.stats()),
            Err(e) => ApiResponse::error(ApiError::from(&e)),
        };
        response.to_json()
    }

    pub fn stats_json(&self) -> String {
        ApiResponse::<ProgressStats>::success(self.engine.stats()).to_json()
    }

    pub fn leaderboard_json(&mut self, request_json: &str) -> String {
        let request: LeaderboardRequest = if request_json.trim().is_empty() {
            LeaderboardRequest::default()
        } else {
            match serde_json::from_str(request_json) {
                Ok(req) => req,
                Err(e) => return invalid_request::<Vec<LeaderboardRow>>(e),
            }
        };

        let response = match self.engine.leaderboard(request.identity.as_ref()) {
            Ok(entries) => ApiResponse::success(
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(i, entry)| LeaderboardRow { rank: i + 1, entry })
                    .collect::<Vec<_>>(),
            ),
            Err(e) => ApiResponse::error(ApiError::from(&e)),
        };
        response.to_json()
    }

    pub fn redeem_json(&mut self, request_json: &str) -> String {
        let request: RedeemRequest = match serde_json::from_str(request_json) {
            Ok(req) => req,
            Err(e) => return invalid_request::<ShopOrder>(e),
        };

        let response = match self.engine.redeem(request.item, &request.recipient) {
            Ok(order) => ApiResponse::success(order),
            Err(e) => ApiResponse::error(self.spend_error(&e)),
        };
        response.to_json()
    }
}

fn invalid_request<T: Serialize>(error: serde_json::Error) -> String {
    tracing::debug!(%error, "rejected malformed request");
    ApiResponse::<T>::error(ApiError::new("INVALID_REQUEST", &error.to_string())).to_json()
}
