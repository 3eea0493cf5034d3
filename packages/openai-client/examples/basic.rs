//! JSON-mode chat completion example

use openai_client::{strip_code_blocks, ChatRequest, Message, OpenAIClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenAIClient::from_env()?;

    let response = client
        .chat_completion(
            ChatRequest::new("gpt-4o-mini")
                .message(Message::system("Return JSON only."))
                .message(Message::user(
                    "Describe the Rust language as {\"summary\": string}.",
                ))
                .temperature(0.2)
                .top_p(0.9)
                .json_object(),
        )
        .await?;

    let value: serde_json::Value = serde_json::from_str(strip_code_blocks(&response.content))?;
    println!("{}", serde_json::to_string_pretty(&value)?);

    if let Some(usage) = response.usage {
        println!("tokens used: {}", usage.total_tokens);
    }

    Ok(())
}
