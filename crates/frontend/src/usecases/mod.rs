pub mod u501_generate_prompt;
pub mod u502_inject_json;
pub mod u503_prompt_assistant;
