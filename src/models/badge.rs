use crossterm::style::Color;
use serde::Serialize;

/// 徽章样式，对应界面颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStyle {
    Yellow,
    Green,
    Blue,
    Purple,
    Red,
}

impl BadgeStyle {
    /// 终端前景色
    pub fn color(self) -> Color {
        match self {
            BadgeStyle::Yellow => Color::Yellow,
            BadgeStyle::Green => Color::Green,
            BadgeStyle::Blue => Color::Blue,
            BadgeStyle::Purple => Color::Magenta,
            BadgeStyle::Red => Color::Red,
        }
    }
}

/// 考试完成后根据得分率发放的徽章
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Badge {
    Perfect,
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl Badge {
    /// 按阈值从高到低匹配，第一个命中的生效
    pub fn for_percentage(percentage: u32) -> Self {
        match percentage {
            100.. => Badge::Perfect,
            80..=99 => Badge::Excellent,
            60..=79 => Badge::Good,
            40..=59 => Badge::Average,
            _ => Badge::NeedsImprovement,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Badge::Perfect => "Perfect Score",
            Badge::Excellent => "Excellent",
            Badge::Good => "Good",
            Badge::Average => "Average",
            Badge::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn style(self) -> BadgeStyle {
        match self {
            Badge::Perfect => BadgeStyle::Yellow,
            Badge::Excellent => BadgeStyle::Green,
            Badge::Good => BadgeStyle::Blue,
            Badge::Average => BadgeStyle::Purple,
            Badge::NeedsImprovement => BadgeStyle::Red,
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 得分率，四舍五入到整数（.5 向上取整）
///
/// 调用方保证 `total > 0`
pub fn percentage(score: usize, total: usize) -> u32 {
    debug_assert!(total > 0, "percentage of an empty exam");
    ((score as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_thresholds() {
        assert_eq!(Badge::for_percentage(100), Badge::Perfect);
        assert_eq!(Badge::for_percentage(99), Badge::Excellent);
        assert_eq!(Badge::for_percentage(80), Badge::Excellent);
        assert_eq!(Badge::for_percentage(79), Badge::Good);
        assert_eq!(Badge::for_percentage(60), Badge::Good);
        assert_eq!(Badge::for_percentage(59), Badge::Average);
        assert_eq!(Badge::for_percentage(40), Badge::Average);
        assert_eq!(Badge::for_percentage(39), Badge::NeedsImprovement);
        assert_eq!(Badge::for_percentage(0), Badge::NeedsImprovement);
    }

    #[test]
    fn test_badge_partition_is_total() {
        // 每个百分比都恰好落在一个区间
        for p in 0..=100 {
            let badge = Badge::for_percentage(p);
            let expected = if p == 100 {
                Badge::Perfect
            } else if p >= 80 {
                Badge::Excellent
            } else if p >= 60 {
                Badge::Good
            } else if p >= 40 {
                Badge::Average
            } else {
                Badge::NeedsImprovement
            };
            assert_eq!(badge, expected, "percentage {}", p);
        }
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(3, 3), 100);
        assert_eq!(percentage(2, 4), 50);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 5), 0);
    }

    #[test]
    fn test_badge_names() {
        assert_eq!(Badge::Perfect.name(), "Perfect Score");
        assert_eq!(Badge::NeedsImprovement.to_string(), "Needs Improvement");
        assert_eq!(Badge::Average.style(), BadgeStyle::Purple);
        assert_eq!(Badge::Average.style().color(), Color::Magenta);
        assert_eq!(Badge::Perfect.style().color(), Color::Yellow);
    }
}
