use crate::timer::Timer;

pub struct AppTimers {
    pub step: Timer,
    pub halo_exchange: Timer,
    pub momentum: Timer,
    pub continuity: Timer,
    pub boundary_conditions: Timer,
    pub diagnostics: Timer,
}

impl AppTimers {
    pub fn new(total_num_steps: usize) -> Self {
        AppTimers {
            step: Timer::new("Total Step", total_num_steps),
            // h, u, v before momentum and u, v after it
            halo_exchange: Timer::new("Halo Exchange", 5 * total_num_steps),
            momentum: Timer::new("Momentum", total_num_steps),
            continuity: Timer::new("Continuity", total_num_steps),
            boundary_conditions: Timer::new("Boundary Conditions", total_num_steps),
            diagnostics: Timer::new("Diagnostics", total_num_steps),
        }
    }

    fn regions(&self) -> [&Timer; 6] {
        [
            &self.step,
            &self.halo_exchange,
            &self.momentum,
            &self.continuity,
            &self.boundary_conditions,
            &self.diagnostics,
        ]
    }

    pub fn generate_report(&self) -> String {
        let rule = "-".repeat(85);
        let mut report = format!(
            "\n{}\n{:<30}{:<10}{:>15}{:>15}{:>15}\n{}",
            rule, "Region", "Count", "Total", "Average", "Std Err", rule
        );

        for timer in self.regions().iter() {
            report.push_str(&format!(
                "\n{:<30}{:<10}{:>15}{:>15}{:>15}",
                timer.region,
                timer.count(),
                format!("{:3.5?}", timer.total()),
                optional(timer.mean().map(|d| format!("{:3.5?}", d))),
                optional(timer.std_dev().map(|d| format!("{:3.5?}", d))),
            ));
        }

        report
    }

    pub fn generate_timings_csv(&self) -> String {
        let header = "Region,Count,Total,Average,Std Dev".to_owned();

        let regions = self.regions();
        let rows = regions.iter().map(|timer| {
            format!(
                "{},{},{:?},{},{}",
                timer.region,
                timer.count(),
                timer.total(),
                optional(timer.mean().map(|d| format!("{:?}", d))),
                optional(timer.std_dev().map(|d| format!("{:?}", d))),
            )
        });

        std::iter::once(header)
            .chain(rows)
            .collect::<Vec<String>>()
            .join("\n")
    }
}

fn optional(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_every_region() {
        let mut app_timers = AppTimers::new(1);
        app_timers.momentum.time(|| ());

        let report = app_timers.generate_report();
        for region in &[
            "Total Step",
            "Halo Exchange",
            "Momentum",
            "Continuity",
            "Boundary Conditions",
            "Diagnostics",
        ] {
            assert!(report.contains(region), "missing {}", region);
        }

        let csv = app_timers.generate_timings_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[3].starts_with("Momentum,1,"));
        assert!(lines[4].starts_with("Continuity,0,"));
        assert!(lines[4].ends_with(",-,-"));
    }
}
