use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::round_tester::RoundTester;
use super::scenarios::TestScenario;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    /// Round code for the base seed, when it has one.
    pub code: Option<String>,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    tester: RoundTester,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(tester: RoundTester, verbose: bool) -> Self {
        Self { tester, verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (players: {} seed: {})",
                        scenario.name.bright_white(),
                        scenario.plan.players,
                        seed
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let outcome = self
                .tester
                .run_plan(&scenario.plan, iteration_seed)
                .and_then(|summary| {
                    scenario
                        .plan
                        .expectations
                        .iter()
                        .try_for_each(|expectation| expectation.check(&summary))
                });

            match outcome {
                Ok(()) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?})",
                            i + 1,
                            iterations
                        );
                    }
                }
                Err(err) => {
                    let message = format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1);
                    log::debug!("{} failed: {message}", scenario.key);
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            message.clone().red()
                        );
                    }
                    failures.push(message);
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            seed,
            code: ladder_game::encode_code(seed),
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::scenarios::get_scenario;
    use ladder_game::LadderConfig;

    fn tester() -> LogicTester {
        LogicTester::new(RoundTester::new(LadderConfig::default_config(), false), false)
    }

    #[test]
    fn runs_one_result_per_seed() {
        let scenario = get_scenario("smoke", 3).unwrap();
        let results = tester().run_scenario(&scenario, &[1, 2], 3);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed));
        assert!(results.iter().all(|r| r.successful_iterations == 3));
        assert!(results.iter().all(|r| r.code.is_none()));
    }

    #[test]
    fn reported_code_replays_the_seed() {
        let seed = ladder_game::decode_code("LD-MAPLE07").unwrap();
        let scenario = get_scenario("smoke", 4).unwrap();
        let results = tester().run_scenario(&scenario, &[seed, 1337], 1);
        assert_eq!(results[0].code.as_deref(), Some("LD-MAPLE07"));
        assert_eq!(results[1].code, None);

        let code = results[0].code.as_deref().unwrap();
        let layout = ladder_game::LayoutConfig::default();
        assert_eq!(
            ladder_game::Layout::generate_seeded(4, &layout, ladder_game::decode_code(code).unwrap()),
            ladder_game::Layout::generate_seeded(4, &layout, seed)
        );
    }

    #[test]
    fn failing_plan_records_failure() {
        let mut scenario = get_scenario("smoke", 3).unwrap();
        scenario.plan.players = 12;
        let results = tester().run_scenario(&scenario, &[5], 2);
        assert!(!results[0].passed);
        assert_eq!(results[0].failures.len(), 2);
        assert_eq!(results[0].average_duration, Duration::ZERO);
    }

    #[test]
    fn durations_serialize_as_millis() {
        let result = ScenarioResult {
            scenario_name: "Smoke".to_string(),
            seed: 1,
            code: None,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            performance_data: vec![Duration::from_millis(12)],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
        let back: ScenarioResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.performance_data, result.performance_data);
    }
}
