use survey_core::QuestionCatalog;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = QuestionCatalog::customer_satisfaction();
    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}
