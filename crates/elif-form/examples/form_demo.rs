use elif_form::{
    configure, field, field_with_label, form, FormOptions, FormRequest, FormResponse,
    MiddlewarePipeline, Rule, StepError,
};
use serde_json::json;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("elif_form=debug"))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(Layer::new().with_writer(std::io::stdout))
        .init();

    configure(FormOptions::new().auto_trim(true));

    let signup = form(vec![
        field("username").is_required().is("^[a-z0-9_]+$", "")?.custom_async(|value, _| async move {
            if value == json!("admin") {
                Err(StepError::new("%s is already taken"))
            } else {
                Ok(None)
            }
        }),
        field_with_label("email", "E-mail").is_required().is_email(),
        field("age").to_int().check(Rule::Int { min: Some(13), max: None }),
        field("tags").to_array().to_lower(),
        field("profile[website]").is_url(),
    ]);

    let pipeline = MiddlewarePipeline::new().add(signup);

    println!("=== elif-form demo ===\n");

    let request = FormRequest::new()
        .with_body(json!({
            "username": "  admin ",
            "email": "admin@example",
            "age": "12",
            "tags": ["Rust", "WEB"],
            "profile": { "website": "example.com" }
        }))
        .with_query(json!({ "ref": "newsletter" }));

    let (request, response) = pipeline
        .execute(request, FormResponse::new(), |request, response| async move {
            Ok((request, response))
        })
        .await?;

    if let Some(result) = request.form() {
        println!("valid:  {}", result.is_valid());
        println!("output: {}", serde_json::to_string_pretty(result)?);
        println!("errors: {:#?}", result.errors());
    }
    println!("locals: {}", response.locals());

    Ok(())
}
