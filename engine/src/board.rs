use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::log;
use super::agent::{Agent, EliminationReason};
use super::error::BoardError;
use super::events::{RenderDiff, TickEvent, TickResult};
use super::food::{FoodItem, FoodSpawner};
use super::identifiers::AgentId;
use super::location::{Direction, Location};
use super::placement::find_free_location;
use super::rng::{RandomSource, SessionRng};
use super::settings::BoardSettings;

/// Authoritative game state. A new game always gets a new `Board`; nothing is
/// reset in place.
pub struct Board<R: RandomSource = SessionRng> {
    width: usize,
    height: usize,
    agents: Vec<Agent>,
    food: FoodSpawner,
    tick_count: u64,
    rng: R,
}

impl<R: RandomSource> Board<R> {
    pub fn new(settings: &BoardSettings, rng: R) -> Result<Self, BoardError> {
        settings.validate()?;

        let mut board = Self {
            width: settings.width,
            height: settings.height,
            agents: Vec::with_capacity(settings.agents.len()),
            food: FoodSpawner::new(settings.food_pool.clone()),
            tick_count: 0,
            rng,
        };

        let reserved: HashSet<Location> = settings
            .agents
            .iter()
            .filter_map(|config| config.start)
            .collect();

        for (index, config) in settings.agents.iter().enumerate() {
            let id = AgentId::new(index as u32 + 1);
            let start = match config.start {
                Some(start) => start,
                None => {
                    let taken = board.occupied_cells();
                    find_free_location(
                        board.width,
                        board.height,
                        &settings.start_region,
                        &mut board.rng,
                        |cell| taken.contains(cell) || reserved.contains(cell),
                    )?
                }
            };
            board.agents.push(Agent::new(
                id,
                settings.agent_tag(index),
                start,
                config.initial_direction,
            ));
        }

        for _ in 0..settings.target_food_count() {
            board.spawn_food()?;
        }

        log!(
            "Board {}x{} created with {} agents and {} food",
            board.width,
            board.height,
            board.agents.len(),
            board.food.len()
        );

        Ok(board)
    }

    /// Discards this board and builds a fresh one, continuing the same random
    /// stream.
    pub fn reset(self, settings: &BoardSettings) -> Result<Self, BoardError> {
        Board::new(settings, self.rng)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id() == id)
    }

    pub fn food(&self) -> &FoodSpawner {
        &self.food
    }

    pub fn enabled_count(&self) -> usize {
        self.agents.iter().filter(|agent| agent.is_enabled()).count()
    }

    pub fn is_over(&self) -> bool {
        self.enabled_count() == 0
    }

    pub fn scores(&self) -> BTreeMap<AgentId, u32> {
        self.agents
            .iter()
            .map(|agent| (agent.id(), agent.score()))
            .collect()
    }

    pub fn best_score(&self) -> u32 {
        self.agents.iter().map(Agent::score).max().unwrap_or(0)
    }

    /// Records the direction for the next tick. Input for an eliminated agent
    /// is dropped silently.
    pub fn set_direction(&mut self, id: AgentId, direction: Direction) -> Result<(), BoardError> {
        let agent = self
            .agents
            .iter_mut()
            .find(|agent| agent.id() == id)
            .ok_or(BoardError::UnknownAgent(id))?;
        agent.set_pending_direction(direction);
        Ok(())
    }

    /// Every occupied cell per visual tag, for a first full draw.
    pub fn initial_diff(&self) -> RenderDiff {
        let mut diff = RenderDiff::new();
        for (tag, cells) in self.occupancy() {
            for cell in cells {
                diff.toggle(&tag, cell);
            }
        }
        diff
    }

    pub fn occupancy(&self) -> BTreeMap<String, BTreeSet<Location>> {
        let mut occupancy: BTreeMap<String, BTreeSet<Location>> = BTreeMap::new();
        for agent in &self.agents {
            occupancy
                .entry(agent.visual_tag().to_string())
                .or_default()
                .extend(agent.snake().cells().copied());
        }
        for item in self.food.items() {
            occupancy
                .entry(item.food_type.visual_tag.clone())
                .or_default()
                .insert(item.location);
        }
        occupancy
    }

    /// Advances every enabled agent by one cell.
    ///
    /// All heads are committed before any collision is judged, so two agents
    /// entering the same cell are both eliminated. Eliminations roll the head
    /// back to the last legal cell. Surviving agents then either eat (and keep
    /// their tail) or move.
    ///
    /// Returns `BoardError::GameOver` without touching the board once no agent
    /// is enabled.
    pub fn tick(&mut self) -> Result<TickResult, BoardError> {
        if self.is_over() {
            return Err(BoardError::GameOver);
        }

        self.tick_count += 1;
        let mut events = Vec::new();
        let mut diff = RenderDiff::new();

        let moving: Vec<usize> = self
            .agents
            .iter()
            .enumerate()
            .filter(|(_, agent)| agent.is_enabled())
            .map(|(index, _)| index)
            .collect();

        for &index in &moving {
            self.agents[index].apply_move();
        }

        let eliminations: Vec<(usize, EliminationReason)> = moving
            .iter()
            .filter_map(|&index| self.collision_reason(index).map(|reason| (index, reason)))
            .collect();

        for (index, reason) in eliminations {
            let agent = &mut self.agents[index];
            agent.rollback_move();
            agent.disable(reason);
            let head = agent.snake().head();
            log!(
                "[tick {}] {} eliminated ({:?}) at ({}, {})",
                self.tick_count,
                agent.visual_tag(),
                reason,
                head.x,
                head.y
            );
            events.push(TickEvent::Eliminated {
                agent: agent.id(),
                reason,
            });
        }

        for &index in &moving {
            if !self.agents[index].is_enabled() {
                continue;
            }

            match self.agents[index].try_eat(&self.food) {
                Some(item) => self.consume(index, item, &mut events, &mut diff),
                None => {
                    let agent = &mut self.agents[index];
                    agent.shrink_tail();
                    let snake = agent.snake();
                    diff.toggle(agent.visual_tag(), snake.head());
                    if let Some(tail) = snake.last_tail() {
                        diff.toggle(agent.visual_tag(), tail);
                    }
                    events.push(TickEvent::Moved { agent: agent.id() });
                }
            }
        }

        if self.is_over() {
            log!(
                "Game over after {} ticks, best score {}",
                self.tick_count,
                self.best_score()
            );
        }

        Ok(TickResult {
            tick: self.tick_count,
            events,
            diff,
        })
    }

    fn consume(
        &mut self,
        index: usize,
        item: FoodItem,
        events: &mut Vec<TickEvent>,
        diff: &mut RenderDiff,
    ) {
        self.food.remove(&item);
        diff.toggle(&item.food_type.visual_tag, item.location);
        events.push(TickEvent::FoodConsumed {
            food: item.id,
            location: item.location,
        });

        match self.spawn_food() {
            Ok(spawned) => {
                diff.toggle(&spawned.food_type.visual_tag, spawned.location);
                events.push(TickEvent::FoodSpawned {
                    food: spawned.id,
                    location: spawned.location,
                });
            }
            Err(e) => {
                log!("[tick {}] No replacement food spawned: {}", self.tick_count, e);
            }
        }

        let agent = &self.agents[index];
        diff.toggle(agent.visual_tag(), agent.snake().head());
        log!(
            "[tick {}] {} ate {} at ({}, {}). Score: {}",
            self.tick_count,
            agent.visual_tag(),
            item.food_type.visual_tag,
            item.location.x,
            item.location.y,
            agent.score()
        );
        events.push(TickEvent::Scored {
            agent: agent.id(),
            points: item.food_type.score_value,
        });
    }

    fn collision_reason(&self, index: usize) -> Option<EliminationReason> {
        let agent = &self.agents[index];

        if agent.hit_wall(self.width, self.height) {
            return Some(EliminationReason::WallCollision);
        }
        if agent.hit_self() {
            return Some(EliminationReason::SelfCollision);
        }

        self.agents
            .iter()
            .filter(|other| other.id() != agent.id())
            .find(|other| agent.hit_other(other.snake()))
            .map(|other| EliminationReason::OtherSnakeCollision(other.id()))
    }

    fn occupied_cells(&self) -> HashSet<Location> {
        self.agents
            .iter()
            .flat_map(|agent| agent.snake().cells())
            .chain(self.food.locations())
            .copied()
            .collect()
    }

    fn spawn_food(&mut self) -> Result<FoodItem, BoardError> {
        let excluded = self.occupied_cells();
        self.food
            .spawn(&excluded, self.width, self.height, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentStatus;
    use crate::food::FoodType;
    use crate::rng::testing::ScriptedRng;
    use crate::settings::AgentConfig;

    fn fixed_board(width: usize, height: usize, agents: Vec<AgentConfig>) -> Board<SessionRng> {
        let mut settings = BoardSettings::new(width, height, agents);
        settings.food_count = Some(0);
        Board::new(&settings, SessionRng::new(1)).unwrap()
    }

    fn id(value: u32) -> AgentId {
        AgentId::new(value)
    }

    #[test]
    fn test_single_agent_hits_top_wall() {
        let mut board = fixed_board(5, 5, vec![AgentConfig::at(Location::new(2, 2), Direction::Up)]);

        let first = board.tick().unwrap();
        assert_eq!(first.events, vec![TickEvent::Moved { agent: id(1) }]);
        let second = board.tick().unwrap();
        assert_eq!(second.events, vec![TickEvent::Moved { agent: id(1) }]);
        assert!(!board.is_over());

        let third = board.tick().unwrap();
        assert_eq!(
            third.events,
            vec![TickEvent::Eliminated {
                agent: id(1),
                reason: EliminationReason::WallCollision,
            }]
        );
        assert!(third.diff.is_empty());
        assert!(board.is_over());
        assert_eq!(board.agent(id(1)).unwrap().snake().head(), Location::new(2, 0));
    }

    #[test]
    fn test_eating_food_grows_and_scores() {
        let mut board = fixed_board(5, 5, vec![AgentConfig::at(Location::new(2, 2), Direction::Up)]);
        let placed = board.food.place(FoodType::new("apple", 1), Location::new(2, 1));

        let result = board.tick().unwrap();

        assert_eq!(result.events.len(), 3);
        assert_eq!(
            result.events[0],
            TickEvent::FoodConsumed {
                food: placed.id,
                location: Location::new(2, 1),
            }
        );
        assert!(matches!(result.events[1], TickEvent::FoodSpawned { .. }));
        assert_eq!(
            result.events[2],
            TickEvent::Scored {
                agent: id(1),
                points: 1,
            }
        );

        let agent = board.agent(id(1)).unwrap();
        assert_eq!(agent.snake().len(), 2);
        assert_eq!(agent.score(), 1);
        assert_eq!(board.food().len(), 1);
        assert_eq!(result.diff.get("snake1"), &[Location::new(2, 1)]);
    }

    #[test]
    fn test_head_to_head_eliminates_both() {
        let mut board = fixed_board(
            5,
            5,
            vec![
                AgentConfig::at(Location::new(1, 2), Direction::Right),
                AgentConfig::at(Location::new(3, 2), Direction::Left),
            ],
        );

        let result = board.tick().unwrap();

        assert_eq!(
            result.events,
            vec![
                TickEvent::Eliminated {
                    agent: id(1),
                    reason: EliminationReason::OtherSnakeCollision(id(2)),
                },
                TickEvent::Eliminated {
                    agent: id(2),
                    reason: EliminationReason::OtherSnakeCollision(id(1)),
                },
            ]
        );
        assert!(board.is_over());
        assert_eq!(board.agent(id(1)).unwrap().snake().head(), Location::new(1, 2));
        assert_eq!(board.agent(id(2)).unwrap().snake().head(), Location::new(3, 2));
    }

    #[test]
    fn test_head_to_head_leaves_third_agent_playing() {
        let mut board = fixed_board(
            5,
            5,
            vec![
                AgentConfig::at(Location::new(1, 2), Direction::Right),
                AgentConfig::at(Location::new(3, 2), Direction::Left),
                AgentConfig::at(Location::new(0, 4), Direction::Up),
            ],
        );

        let result = board.tick().unwrap();

        assert_eq!(
            result.events,
            vec![
                TickEvent::Eliminated {
                    agent: id(1),
                    reason: EliminationReason::OtherSnakeCollision(id(2)),
                },
                TickEvent::Eliminated {
                    agent: id(2),
                    reason: EliminationReason::OtherSnakeCollision(id(1)),
                },
                TickEvent::Moved { agent: id(3) },
            ]
        );
        assert!(!board.is_over());
        assert_eq!(board.enabled_count(), 1);
        assert_eq!(board.agent(id(3)).unwrap().snake().head(), Location::new(0, 3));

        board.tick().unwrap();
        assert_eq!(board.agent(id(3)).unwrap().snake().head(), Location::new(0, 2));
        assert_eq!(board.agent(id(1)).unwrap().snake().head(), Location::new(1, 2));
    }

    #[test]
    fn test_eating_last_free_cell_skips_replacement() {
        let mut board = fixed_board(2, 1, vec![AgentConfig::at(Location::new(0, 0), Direction::Right)]);
        let placed = board.food.place(FoodType::new("apple", 1), Location::new(1, 0));

        let first = board.tick().unwrap();

        assert_eq!(
            first.events,
            vec![
                TickEvent::FoodConsumed {
                    food: placed.id,
                    location: Location::new(1, 0),
                },
                TickEvent::Scored {
                    agent: id(1),
                    points: 1,
                },
            ]
        );
        assert!(board.food().is_empty());
        assert_eq!(board.agent(id(1)).unwrap().score(), 1);
        assert_eq!(board.agent(id(1)).unwrap().snake().len(), 2);
        assert_eq!(first.diff.get("apple"), &[Location::new(1, 0)]);
        assert_eq!(first.diff.get("snake1"), &[Location::new(1, 0)]);

        let second = board.tick().unwrap();
        assert_eq!(
            second.events,
            vec![TickEvent::Eliminated {
                agent: id(1),
                reason: EliminationReason::WallCollision,
            }]
        );
        assert!(board.is_over());
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let settings = BoardSettings::with_players(0, 5, 1);
        let result = Board::new(&settings, SessionRng::new(1));
        assert!(matches!(result, Err(BoardError::Validation(_))));
    }

    #[test]
    fn test_empty_agent_list_is_rejected() {
        let settings = BoardSettings::new(5, 5, Vec::new());
        assert!(matches!(
            Board::new(&settings, SessionRng::new(1)),
            Err(BoardError::Validation(_))
        ));
    }

    #[test]
    fn test_tick_after_game_over_is_rejected() {
        let mut board = fixed_board(3, 3, vec![AgentConfig::at(Location::new(1, 0), Direction::Up)]);
        board.tick().unwrap();
        assert!(board.is_over());

        let ticks = board.tick_count();
        assert_eq!(board.tick(), Err(BoardError::GameOver));
        assert_eq!(board.tick_count(), ticks);
    }

    #[test]
    fn test_disabled_snake_is_frozen_obstacle() {
        let mut board = fixed_board(
            5,
            5,
            vec![
                AgentConfig::at(Location::new(0, 0), Direction::Up),
                AgentConfig::at(Location::new(2, 0), Direction::Left),
            ],
        );

        let first = board.tick().unwrap();
        assert_eq!(first.eliminated().collect::<Vec<_>>(), vec![id(1)]);
        let frozen = board.agent(id(1)).unwrap().snake().clone();

        let second = board.tick().unwrap();
        assert_eq!(
            second.events,
            vec![TickEvent::Eliminated {
                agent: id(2),
                reason: EliminationReason::OtherSnakeCollision(id(1)),
            }]
        );
        assert_eq!(board.agent(id(1)).unwrap().snake(), &frozen);
        assert_eq!(
            board.agent(id(1)).unwrap().status(),
            AgentStatus::Disabled(EliminationReason::WallCollision)
        );
    }

    #[test]
    fn test_head_entering_vacating_tail_collides() {
        let mut board = fixed_board(
            6,
            5,
            vec![
                AgentConfig::at(Location::new(1, 2), Direction::Right),
                AgentConfig::at(Location::new(2, 2), Direction::Right),
            ],
        );

        let result = board.tick().unwrap();

        assert_eq!(
            result.events,
            vec![
                TickEvent::Eliminated {
                    agent: id(1),
                    reason: EliminationReason::OtherSnakeCollision(id(2)),
                },
                TickEvent::Moved { agent: id(2) },
            ]
        );
        assert_eq!(board.agent(id(2)).unwrap().snake().head(), Location::new(3, 2));
    }

    #[test]
    fn test_last_direction_before_tick_wins() {
        let mut board = fixed_board(5, 5, vec![AgentConfig::at(Location::new(2, 2), Direction::Up)]);
        board.set_direction(id(1), Direction::Left).unwrap();
        board.set_direction(id(1), Direction::Down).unwrap();
        board.tick().unwrap();
        assert_eq!(board.agent(id(1)).unwrap().snake().head(), Location::new(2, 3));
    }

    #[test]
    fn test_set_direction_unknown_agent() {
        let mut board = fixed_board(5, 5, vec![AgentConfig::at(Location::new(2, 2), Direction::Up)]);
        assert_eq!(
            board.set_direction(id(7), Direction::Left),
            Err(BoardError::UnknownAgent(id(7)))
        );
    }

    #[test]
    fn test_self_collision_after_growth() {
        let mut board = fixed_board(5, 5, vec![AgentConfig::at(Location::new(2, 2), Direction::Up)]);
        board.food.place(FoodType::new("apple", 1), Location::new(2, 1));
        board.tick().unwrap();

        board.set_direction(id(1), Direction::Down).unwrap();
        let result = board.tick().unwrap();
        assert_eq!(
            result.events,
            vec![TickEvent::Eliminated {
                agent: id(1),
                reason: EliminationReason::SelfCollision,
            }]
        );
        assert_eq!(board.agent(id(1)).unwrap().snake().len(), 2);
    }

    #[test]
    fn test_random_starts_do_not_overlap() {
        let mut settings = BoardSettings::with_players(3, 3, 9);
        settings.food_count = Some(0);
        let board = Board::new(&settings, SessionRng::new(11)).unwrap();

        let starts: HashSet<Location> =
            board.agents().iter().map(|agent| agent.snake().head()).collect();
        assert_eq!(starts.len(), 9);
        assert!(starts.iter().all(|cell| cell.is_within(3, 3)));
    }

    #[test]
    fn test_random_starts_avoid_explicit_starts() {
        let mut agents = vec![AgentConfig::default(); 3];
        agents.push(AgentConfig::at(Location::new(1, 1), Direction::Up));
        let mut settings = BoardSettings::new(2, 2, agents);
        settings.food_count = Some(0);
        let board = Board::new(&settings, ScriptedRng::new(vec![0.5])).unwrap();

        let starts: HashSet<Location> =
            board.agents().iter().map(|agent| agent.snake().head()).collect();
        assert_eq!(starts.len(), 4);
        assert_eq!(board.agent(id(4)).unwrap().snake().head(), Location::new(1, 1));
    }

    #[test]
    fn test_saturated_board_fails_construction() {
        let mut settings = BoardSettings::with_players(2, 2, 4);
        settings.food_count = Some(1);
        assert!(matches!(
            Board::new(&settings, SessionRng::new(2)),
            Err(BoardError::BoardFull)
        ));
    }

    #[test]
    fn test_default_food_count_matches_agents() {
        let settings = BoardSettings::with_players(10, 10, 2);
        let board = Board::new(&settings, SessionRng::new(4)).unwrap();
        assert_eq!(board.food().len(), 2);

        let occupied: HashSet<Location> = board
            .agents()
            .iter()
            .flat_map(|agent| agent.snake().cells().copied())
            .collect();
        assert!(board.food().locations().all(|loc| !occupied.contains(loc)));
    }

    #[test]
    fn test_reset_builds_fresh_board() {
        let settings = BoardSettings::new(5, 5, vec![AgentConfig::at(Location::new(2, 2), Direction::Up)]);
        let mut board = Board::new(&settings, SessionRng::new(8)).unwrap();
        while !board.is_over() {
            board.tick().unwrap();
        }

        let board = board.reset(&settings).unwrap();
        assert!(!board.is_over());
        assert_eq!(board.tick_count(), 0);
        assert_eq!(board.scores().get(&id(1)), Some(&0));
    }

    #[test]
    fn test_initial_diff_covers_everything() {
        let settings = BoardSettings::with_players(8, 8, 2);
        let board = Board::new(&settings, SessionRng::new(21)).unwrap();
        let diff = board.initial_diff();

        assert_eq!(diff.get("snake1").len(), 1);
        assert_eq!(diff.get("snake2").len(), 1);
        let food_cells: usize = diff
            .iter()
            .filter(|(tag, _)| !tag.starts_with("snake"))
            .map(|(_, cells)| cells.len())
            .sum();
        assert_eq!(food_cells, 2);
    }

    fn random_direction(rng: &mut SessionRng) -> Direction {
        Direction::ALL[crate::rng::pick_index(rng, Direction::ALL.len())]
    }

    fn play_random_game(seed: u64, input_seed: u64, max_ticks: usize) -> Vec<TickResult> {
        let mut settings = BoardSettings::with_players(12, 12, 3);
        settings.food_count = Some(6);
        let mut board = Board::new(&settings, SessionRng::new(seed)).unwrap();
        let mut input = SessionRng::new(input_seed);
        let mut results = Vec::new();

        for _ in 0..max_ticks {
            if board.is_over() {
                break;
            }
            for agent in 1..=3 {
                if input.next_f64() < 0.3 {
                    let direction = random_direction(&mut input);
                    board.set_direction(id(agent), direction).unwrap();
                }
            }
            results.push(board.tick().unwrap());
        }
        results
    }

    #[test]
    fn test_same_seed_same_results() {
        let first = play_random_game(42, 7, 300);
        let second = play_random_game(42, 7, 300);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_tick_invariants_hold_over_random_games() {
        for seed in 0..20 {
            let mut settings = BoardSettings::with_players(10, 10, 3);
            settings.food_count = Some(5);
            let mut board = Board::new(&settings, SessionRng::new(seed)).unwrap();
            let mut input = SessionRng::new(seed + 1000);
            let mut rendered = board.occupancy();

            for _ in 0..200 {
                if board.is_over() {
                    break;
                }
                for agent in 1..=3 {
                    if input.next_f64() < 0.25 {
                        let direction = random_direction(&mut input);
                        board.set_direction(id(agent), direction).unwrap();
                    }
                }

                let before: Vec<Agent> = board.agents().to_vec();
                let result = board.tick().unwrap();

                for old in &before {
                    let new = board.agent(old.id()).unwrap();
                    if !old.is_enabled() {
                        assert_eq!(new.snake(), old.snake());
                        continue;
                    }

                    let expected_head = old.snake().head().next(old.pending_direction());
                    let scored = result.scored().find(|(agent, _)| *agent == old.id());
                    let moved = result
                        .events
                        .contains(&TickEvent::Moved { agent: old.id() });

                    if let Some((_, points)) = scored {
                        assert_eq!(new.snake().len(), old.snake().len() + 1);
                        assert_eq!(new.score(), old.score() + points);
                        assert_eq!(new.snake().head(), expected_head);
                    } else if moved {
                        assert_eq!(new.snake().len(), old.snake().len());
                        assert_eq!(new.score(), old.score());
                        assert_eq!(new.snake().head(), expected_head);
                    } else {
                        assert!(!new.is_enabled());
                        assert_eq!(new.snake(), old.snake());
                    }
                }

                let snake_cells: HashSet<Location> = board
                    .agents()
                    .iter()
                    .flat_map(|agent| agent.snake().cells().copied())
                    .collect();
                let food_cells: Vec<Location> = board.food().locations().copied().collect();
                let unique_food: HashSet<Location> = food_cells.iter().copied().collect();
                assert_eq!(unique_food.len(), food_cells.len());
                assert!(food_cells.iter().all(|cell| !snake_cells.contains(cell)));
                assert!(food_cells.iter().all(|cell| cell.is_within(10, 10)));

                result.diff.apply(&mut rendered);
                assert_eq!(rendered, board.occupancy());
            }
        }
    }
}
