//! The `classtest init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create classtest.toml
    if std::path::Path::new("classtest.toml").exists() {
        println!("classtest.toml already exists, skipping.");
    } else {
        std::fs::write("classtest.toml", SAMPLE_CONFIG)?;
        println!("Created classtest.toml");
    }

    // Create sample catalog
    std::fs::create_dir_all("catalog")?;
    let sample_path = std::path::Path::new("catalog/sample.toml");
    if sample_path.exists() {
        println!("catalog/sample.toml already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_CATALOG)?;
        println!("Created catalog/sample.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: classtest validate");
    println!("  2. Run: classtest tests");
    println!("  3. Run: classtest start --student \"Anna\" --variant math-5-v1");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# classtest configuration

store_path = "classtest-data/testSubmissions.json"
catalog_path = "catalog"
teacher_name = "никитовский"

# "reset" starts from an empty list when the store file is unreadable,
# "fail" refuses to run until it is fixed.
on_corrupt_store = "reset"

[school_hours]
open = "10:00"
close = "22:45"
enforce = false
"#;

const SAMPLE_CATALOG: &str = r#"[[variants]]
id = "math-5-v1"
name = "Variant 1"
grade = 5
subject = "Mathematics"

[[variants.questions]]
id = 1
text = "2 + 2 = ?"
answer = "4"

[[variants.questions]]
id = 2
text = "7 * 8 = ?"
answer = "56"

[[variants.questions]]
id = 3
text = "What is half of 90?"
answer = "45"

[[variants]]
id = "math-5-v2"
name = "Variant 2"
grade = 5
subject = "Mathematics"

[[variants.questions]]
id = 1
text = "3 + 5 = ?"
answer = "8"

[[variants.questions]]
id = 2
text = "9 * 6 = ?"
answer = "54"

[[variants.questions]]
id = 3
text = "What is a third of 60?"
answer = "20"

[[variants]]
id = "geo-6-v1"
name = "Variant 1"
grade = 6
subject = "Geography"

[[variants.questions]]
id = 1
text = "What is the capital of France?"
answer = "Paris"

[[variants.questions]]
id = 2
text = "Which ocean is the largest?"
answer = "Pacific"
"#;
