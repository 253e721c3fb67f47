use log::info;
use rs_charlm_core::io::{list_files, normalize_folder};
use rs_charlm_core::model::language_model::LanguageModel;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Number of characters used as context for the next one.
    // Small windows give noisy text, large windows tend to copy the corpus
    let window_length = 7;

    // With a seed, two runs over the same corpora print the same texts
    let mut model = LanguageModel::with_seed(window_length, 42);

    // Train on every text file of the "data" directory.
    // Training is cumulative: counts from every corpus add up
    let folder = normalize_folder("./data");
    for file in list_files(&folder, "txt")? {
        info!("training on {}", file);
        model.train_file(folder.join(&file))?;
    }

    if model.is_empty() {
        println!("Nothing learned, add some .txt corpora to ./data");
        return Ok(());
    }
    println!("Learned {} windows of {} characters", model.len(), window_length);

    // Initial text shorter than the window: returned as-is
    println!("Too short: {:?}", model.generate("abc", 100));

    // Initial text whose last window never appeared: returned as-is
    println!("Unknown: {:?}", model.generate("zzzzzzzzzz", 100));

    // Generate 5 texts of 300 characters from random learned windows.
    // Only the window is kept at the start of the generated text
    for i in 0..5 {
        let Some(seed_window) = model.random_window() else { break };
        println!("Generated text {}:\n{}\n", i + 1, model.generate(&seed_window, 300));
    }

    // The same seed and corpora always give the same text
    let mut original = LanguageModel::with_seed(window_length, 42);
    let mut replay = LanguageModel::with_seed(window_length, 42);
    for file in list_files(&folder, "txt")? {
        original.train_file(folder.join(&file))?;
        replay.train_file(folder.join(&file))?;
    }
    let window = model.random_window().unwrap_or_default();
    println!(
        "Reproducible: {}",
        original.generate(&window, 300) == replay.generate(&window, 300)
    );

    // Models trained separately (one per corpus) can be merged into one
    let mut merged = LanguageModel::new(window_length);
    for file in list_files(&folder, "txt")? {
        let mut partial = LanguageModel::new(window_length);
        partial.train_file(folder.join(&file))?;
        merged.merge(&partial)?;
    }
    println!("Merged model holds {} windows", merged.len());

    Ok(())
}
