//! Tree rendering functionality for debugging and visualization.

use super::Tree;

impl<T> Tree<T>
where
    T: Clone + std::fmt::Display + 'static,
{
    /// Render the tree structure as a string for debugging.
    ///
    /// Forces the whole tree; intended for small diagnostic trees.
    pub fn render(&self) -> String {
        let mut result = String::new();
        self.render_recursive(&mut result, "", true);
        result
    }

    fn render_recursive(&self, result: &mut String, prefix: &str, is_last: bool) {
        result.push_str(prefix);
        if is_last {
            result.push_str("└── ");
        } else {
            result.push_str("├── ");
        }
        result.push_str(&format!("{}\n", self.value));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        let children = self.children();
        for (i, child) in children.iter().enumerate() {
            let child_is_last = i == children.len() - 1;
            child.render_recursive(result, &child_prefix, child_is_last);
        }
    }

    /// Render the tree structure compactly, showing only values.
    pub fn render_compact(&self) -> String {
        let children = self.children();
        if children.is_empty() {
            format!("{}", self.value)
        } else {
            let children_str: Vec<String> = children
                .iter()
                .map(|child| child.render_compact())
                .collect();
            format!("{}[{}]", self.value, children_str.join(", "))
        }
    }

    /// Render the tree showing only the shrink sequence.
    pub fn render_shrinks(&self) -> String {
        let shrinks = self.shrinks();
        if shrinks.is_empty() {
            format!("{} (no shrinks)", self.value)
        } else {
            let shrink_strs: Vec<String> = shrinks.iter().map(|v| format!("{v}")).collect();
            format!("{} → [{}]", self.value, shrink_strs.join(", "))
        }
    }
}
