use crate::domain::model::{GenerationRequest, ResponseSchema};

pub const SYSTEM_PROMPT: &str = "You are a strategic AI Automation Consultant. \
The user provides a business context and a problem. \
Your task is to generate a concise, three-step automation plan (using AI/Code/APIs) \
that directly solves their stated problem, focusing on minimizing human error and maximizing efficiency. \
Output ONLY a JSON array containing three strings, where each string is one step of the roadmap. \
Do NOT include any introductory or concluding text outside the JSON array.";

pub fn user_query(business: &str, problem: &str) -> String {
    format!("Business/Industry: {}. Key Problem: {}.", business, problem)
}

pub fn roadmap_request(business: &str, problem: &str) -> GenerationRequest {
    GenerationRequest {
        system_instruction: SYSTEM_PROMPT.to_string(),
        user_query: user_query(business, problem),
        response_schema: ResponseSchema::array_of(ResponseSchema::string()),
    }
}
