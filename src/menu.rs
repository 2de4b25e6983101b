use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub name: &'static str,
    pub calories: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuCategory {
    pub name: &'static str,
    pub items: &'static [MenuItem],
}

pub const CALORIE_BANNER_LABEL: &str = "Recommended calorie intake per meal:";
pub const CALORIE_BANNER_RANGE: &str = "500–700 kcal";

pub static MENU: &[MenuCategory] = &[
    MenuCategory {
        name: "Starters",
        items: &[
            MenuItem { name: "Caesar Salad", calories: 150 },
            MenuItem { name: "Garlic Bread", calories: 200 },
            MenuItem { name: "Soup of the Day", calories: 120 },
        ],
    },
    MenuCategory {
        name: "Main Course",
        items: &[
            MenuItem { name: "Grilled Salmon", calories: 550 },
            MenuItem { name: "Pasta Carbonara", calories: 650 },
            MenuItem { name: "Ribeye Steak", calories: 700 },
            MenuItem { name: "Vegetarian Lasagna", calories: 480 },
        ],
    },
    MenuCategory {
        name: "Desserts",
        items: &[
            MenuItem { name: "Chocolate Cake", calories: 320 },
            MenuItem { name: "Cheesecake", calories: 380 },
            MenuItem { name: "Tiramisu", calories: 350 },
            MenuItem { name: "Sorbet", calories: 150 },
        ],
    },
];

impl MenuItem {
    pub fn calorie_label(&self) -> String {
        format!("~{} kcal", self.calories)
    }
}

/// Lay out the banner and every category as styled lines for the menu pane
pub fn menu_lines() -> Vec<Line<'static>> {
    // Range on its own line so narrow panes never split it
    let mut lines = vec![
        Line::from(Span::styled(CALORIE_BANNER_LABEL, Style::default().fg(Color::Green))),
        Line::from(Span::styled(
            CALORIE_BANNER_RANGE,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];

    for category in MENU {
        lines.push(Line::from(Span::styled(
            category.name,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        for item in category.items {
            lines.push(Line::from(vec![
                Span::raw(format!("  {}", item.name)),
                Span::raw("  "),
                Span::styled(item.calorie_label(), Style::default().fg(Color::DarkGray)),
            ]));
        }
        lines.push(Line::default());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_menu_categories_in_order() {
        let names: Vec<&str> = MENU.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Starters", "Main Course", "Desserts"]);
        assert_eq!(MENU.iter().map(|c| c.items.len()).sum::<usize>(), 11);
    }

    #[test]
    fn test_calorie_label() {
        let item = MenuItem { name: "Sorbet", calories: 150 };
        assert_eq!(item.calorie_label(), "~150 kcal");
    }

    #[test]
    fn test_menu_lines_include_banner_and_items() {
        let text = plain(&menu_lines());
        assert_eq!(text[0], "Recommended calorie intake per meal:");
        assert_eq!(text[1], "500–700 kcal");
        assert!(text.contains(&"Main Course".to_string()));
        assert!(text.contains(&"  Vegetarian Lasagna  ~480 kcal".to_string()));
        assert!(text.contains(&"  Ribeye Steak  ~700 kcal".to_string()));
    }

    #[test]
    fn test_menu_lines_are_stable_across_renders() {
        let first = menu_lines();
        let second = menu_lines();
        assert_eq!(first, second);
        assert_eq!(plain(&first), plain(&second));
    }
}
