use super::*;
use serde::Deserialize;
use std::time::Instant;

/// Open Trivia Database source
pub struct OpenTdbSource {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl OpenTdbSource {
    /// Create a new source for the given base URL (e.g. `https://opentdb.com`)
    pub fn new(base_url: String, timeout: Duration) -> SourceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Request(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OpenTdbResponse {
    response_code: i64,
    #[serde(default)]
    results: Vec<OpenTdbQuestion>,
}

#[derive(Debug, Deserialize)]
struct OpenTdbQuestion {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

/// Map an API response body onto question records
fn into_records(response: OpenTdbResponse, requested: u32) -> SourceResult<Vec<QuestionRecord>> {
    match response.response_code {
        0 => {}
        // Not enough questions for this query
        1 => return Ok(Vec::new()),
        2 => return Err(SourceError::InvalidParameter),
        code @ (3 | 4) => return Err(SourceError::Token(code)),
        5 => return Err(SourceError::RateLimit),
        code => return Err(SourceError::Api(code)),
    }

    response
        .results
        .into_iter()
        .take(requested as usize)
        .map(|q| {
            if q.correct_answer.is_empty() {
                return Err(SourceError::Parse(
                    "Question without a correct answer".to_string(),
                ));
            }
            Ok(QuestionRecord {
                question: q.question,
                correct_answer: q.correct_answer,
                incorrect_answers: q.incorrect_answers,
            })
        })
        .collect()
}

#[async_trait]
impl QuestionSource for OpenTdbSource {
    async fn fetch(&self, request: FetchRequest) -> SourceResult<Vec<QuestionRecord>> {
        let start = Instant::now();
        let url = format!("{}/api.php", self.base_url);
        let amount = request.count.get();

        let response = tokio::time::timeout(
            self.timeout,
            self.client
                .get(&url)
                .query(&[
                    ("amount", amount.to_string()),
                    ("category", request.category_id.to_string()),
                    ("difficulty", request.difficulty.to_string()),
                    ("type", request.answer_type.to_string()),
                ])
                .send(),
        )
        .await
        .map_err(|_| SourceError::Timeout(self.timeout))?
        .map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout)
            } else {
                SourceError::Request(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(SourceError::Http(response.status().as_u16()));
        }

        let body: OpenTdbResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        let records = into_records(body, amount)?;

        tracing::info!(
            "Fetched {} questions (category={}, requested={}) in {}ms",
            records.len(),
            request.category_id,
            amount,
            start.elapsed().as_millis()
        );

        Ok(records)
    }

    fn name(&self) -> &str {
        "opentdb"
    }
}
