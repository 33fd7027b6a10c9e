//! `libforge recipes` - list builtin recipes.

use anyhow::Result;

use libforge::recipe::builtin;

pub fn execute() -> Result<()> {
    for name in builtin::builtin_names() {
        if let Some(recipe) = builtin::builtin(name) {
            println!("{:<8} {} ({})", name, recipe.git_url, recipe.default_branch);
        }
    }
    Ok(())
}
