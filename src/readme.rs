use std::fs;
use std::path::Path;

use crate::capabilities::CapabilityRegistry;
use crate::error::Result;

/// README text for the assistant, listing the functions it offers.
pub fn render_readme(registry: &CapabilityRegistry) -> String {
    let mut readme = String::from(
        "# Function Calling Assistant\n\n\
         This assistant uses a chat model's function calling to:\n",
    );

    for descriptor in registry.list() {
        readme.push_str(&format!(
            "- `{}`: {}\n",
            descriptor.name, descriptor.description
        ));
    }

    readme.push_str(
        "\n### Example Prompts:\n\
         - What time is it?\n\
         - Can you make me a to-do list to start a clothing brand?\n\
         \n### Run Instructions:\n\
         ```bash\n\
         export OPENAI_API_KEY=...   # or omit it and enter the key at the prompt\n\
         fncall \"Can I have a to-do list to learn about the stock market?\"\n\
         ```\n",
    );

    readme
}

pub fn write_readme(registry: &CapabilityRegistry, path: &Path) -> Result<()> {
    fs::write(path, render_readme(registry))?;
    Ok(())
}
