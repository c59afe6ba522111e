//! [`Ingredients`], [`Preferences`] and [`build`], which turns them into the
//! natural-language prompt sent to the model.

/// Error for an ingredient list with no usable entries.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("at least one ingredient is required")]
pub struct EmptyIngredients;

/// Ordered list of ingredients. Entries are trimmed and never empty, and a
/// list built with [`try_new`] always has at least one entry.
///
/// [`try_new`]: Self::try_new
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ingredients {
    items: Vec<String>,
}

impl Ingredients {
    /// Separator used when the list is rendered.
    pub const SEP: &'static str = ", ";

    /// Create an empty list, for collecting entries one at a time with
    /// [`push`].
    ///
    /// [`push`]: Self::push
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list from an iterable, skipping blank entries. Fails if no
    /// entry remains.
    pub fn try_new<S, Ss>(ingredients: Ss) -> Result<Self, EmptyIngredients>
    where
        S: AsRef<str>,
        Ss: IntoIterator<Item = S>,
    {
        let mut list = Self::new();
        for ingredient in ingredients {
            list.push(ingredient);
        }

        if list.is_empty() {
            Err(EmptyIngredients)
        } else {
            Ok(list)
        }
    }

    /// Add an ingredient. Blank input is ignored. Returns `true` if the entry
    /// was added.
    pub fn push<S>(&mut self, ingredient: S) -> bool
    where
        S: AsRef<str>,
    {
        let ingredient = ingredient.as_ref().trim();
        if ingredient.is_empty() {
            return false;
        }

        self.items.push(ingredient.to_string());
        true
    }

    /// Number of ingredients.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no ingredient has been added yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the ingredients in input order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

impl std::fmt::Display for Ingredients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `Iterator::intersperse` is not stable.
        let mut iter = self.iter();
        if let Some(first) = iter.next() {
            f.write_str(first)?;
            for ingredient in iter {
                write!(f, "{}{}", Self::SEP, ingredient)?;
            }
        }
        Ok(())
    }
}

/// Optional free-text preferences. Both are trimmed and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    /// Dietary restrictions, for example "vegetarian".
    pub dietary: String,
    /// Preferred cuisine, for example "Indian".
    pub cuisine: String,
}

impl Preferences {
    /// Shown in the prompt when no dietary restriction was given.
    pub const NO_DIETARY: &'static str = "None";
    /// Shown in the prompt when no cuisine was given.
    pub const ANY_CUISINE: &'static str = "Any";

    /// Create preferences, trimming both values.
    pub fn new<D, C>(dietary: D, cuisine: C) -> Self
    where
        D: AsRef<str>,
        C: AsRef<str>,
    {
        Self {
            dietary: dietary.as_ref().trim().to_string(),
            cuisine: cuisine.as_ref().trim().to_string(),
        }
    }

    /// Dietary restriction as it appears in the prompt.
    pub fn dietary_or_default(&self) -> &str {
        if self.dietary.is_empty() {
            Self::NO_DIETARY
        } else {
            &self.dietary
        }
    }

    /// Cuisine as it appears in the prompt.
    pub fn cuisine_or_default(&self) -> &str {
        if self.cuisine.is_empty() {
            Self::ANY_CUISINE
        } else {
            &self.cuisine
        }
    }
}

/// What the model is asked to provide, in order.
pub const INSTRUCTIONS: [&str; 8] = [
    "Recipe name",
    "Cooking time (prep + cook)",
    "Servings",
    "Complete ingredients list (including quantities and any additional ingredients needed)",
    "Step-by-step cooking instructions",
    "Difficulty level (Easy/Medium/Hard)",
    "Nutritional highlights",
    "Tips for best results",
];

/// Build the recipe prompt. The same inputs always produce the same text.
pub fn build(ingredients: &Ingredients, preferences: &Preferences) -> String {
    let mut prompt = format!(
        "Create a detailed recipe using the following ingredients: {ingredients}\n\
         \n\
         Additional preferences:\n\
         - Dietary restrictions: {}\n\
         - Cuisine type: {}\n\
         \n\
         Please provide:\n",
        preferences.dietary_or_default(),
        preferences.cuisine_or_default(),
    );

    for (i, instruction) in INSTRUCTIONS.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, instruction));
    }

    prompt.push_str(
        "\nMake the recipe practical and delicious. If some common pantry \
         staples (salt, pepper, oil, etc.) are needed but not listed, include \
         them in the ingredients with quantities.\n\
         \n\
         Format the response in a clear, organized manner.\n",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredients_try_new() {
        let ingredients =
            Ingredients::try_new([" chicken ", "", "rice", "  "]).unwrap();
        assert_eq!(ingredients.len(), 2);
        assert_eq!(ingredients.iter().collect::<Vec<_>>(), ["chicken", "rice"]);
        assert_eq!(ingredients.to_string(), "chicken, rice");
    }

    #[test]
    fn test_ingredients_empty() {
        assert_eq!(
            Ingredients::try_new(Vec::<String>::new()).unwrap_err(),
            EmptyIngredients
        );
        assert_eq!(
            Ingredients::try_new(["", " "]).unwrap_err(),
            EmptyIngredients
        );
    }

    #[test]
    fn test_ingredients_push() {
        let mut ingredients = Ingredients::new();
        assert!(ingredients.is_empty());
        assert!(!ingredients.push("   "));
        assert!(ingredients.push("eggs"));
        assert_eq!(ingredients.to_string(), "eggs");
    }

    #[test]
    fn test_preferences_trimmed() {
        let preferences = Preferences::new("  vegan ", "\tThai\n");
        assert_eq!(preferences.dietary, "vegan");
        assert_eq!(preferences.cuisine, "Thai");
    }

    #[test]
    fn test_build_defaults() {
        let ingredients = Ingredients::try_new(["eggs"]).unwrap();
        let prompt = build(&ingredients, &Preferences::default());

        assert!(prompt.contains("- Dietary restrictions: None\n"));
        assert!(prompt.contains("- Cuisine type: Any\n"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let ingredients = Ingredients::try_new(["tofu", "noodles"]).unwrap();
        let preferences = Preferences::new("vegan", "Thai");

        assert_eq!(
            build(&ingredients, &preferences),
            build(&ingredients, &preferences)
        );
    }

    #[test]
    fn test_build_ingredients_in_order_once() {
        let names = ["saffron", "basmati rice", "cardamom", "ghee"];
        let ingredients = Ingredients::try_new(names).unwrap();
        let prompt = build(&ingredients, &Preferences::default());

        assert!(prompt.contains("saffron, basmati rice, cardamom, ghee"));
        for name in names {
            assert_eq!(prompt.matches(name).count(), 1, "{name}");
        }
    }

    #[test]
    fn test_build_instructions() {
        let ingredients = Ingredients::try_new(["eggs"]).unwrap();
        let prompt = build(&ingredients, &Preferences::default());

        assert!(prompt.contains("1. Recipe name\n"));
        assert!(prompt.contains("6. Difficulty level (Easy/Medium/Hard)\n"));
        assert!(prompt.contains("8. Tips for best results\n"));
        assert!(!prompt.contains("9. "));
        assert!(prompt.ends_with("Format the response in a clear, organized manner.\n"));
    }

    #[test]
    fn test_build_chicken_rice_indian() {
        let ingredients = Ingredients::try_new(["chicken", "rice"]).unwrap();
        let preferences = Preferences::new("", "Indian");
        let prompt = build(&ingredients, &preferences);

        assert!(prompt.starts_with(
            "Create a detailed recipe using the following ingredients: \
             chicken, rice\n"
        ));
        assert!(prompt.contains("Dietary restrictions: None"));
        assert!(prompt.contains("Cuisine type: Indian"));
    }
}
