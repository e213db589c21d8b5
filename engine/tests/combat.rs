use engine::combat::actions::{combo_bonus, fire_base};
use engine::combat::grant_spoils;
use engine::{
    Attack, BattleAction, BattleOutcome, BattleSession, Dice, Player, ScriptedActions, Species,
    Status, Weather, WeatherState,
};

fn attack(name: &str, damage: i32, miss: f64, crit: f64) -> Attack {
    Attack { name: name.into(), damage, miss, crit, inflicts: None }
}

fn species(hp: i32, attacks: Vec<Attack>) -> Species {
    Species { name: "Dummy".into(), hp, attacks, boss: false, mystery_spawn: false }
}

fn sky(kind: Weather) -> WeatherState {
    WeatherState { kind, turns: 5 }
}

#[test]
fn fog_softens_landed_enemy_damage() {
    let s = species(50, vec![attack("Slam", 15, 0.0, 0.0)]);
    let mut session = BattleSession::new(&s, 50);
    let mut p = Player::default();
    let mut dice = Dice::from_scripted(vec![0.0, 0.5]);
    assert_eq!(session.enemy_phase(&mut p, &sky(Weather::Fog), &mut dice, |_| {}), None);
    assert_eq!(p.hp(), 109);
    assert_eq!(p.stats.damage_taken, 11);
}

#[test]
fn enemy_crit_without_fog() {
    let s = species(50, vec![attack("Slam", 10, 0.0, 1.0)]);
    let mut session = BattleSession::new(&s, 50);
    let mut p = Player::default();
    let mut dice = Dice::from_scripted(vec![0.0, 0.5]);
    session.enemy_phase(&mut p, &sky(Weather::Clear), &mut dice, |_| {});
    assert_eq!(p.hp(), 105);
}

#[test]
fn poison_lands_once_and_ticks_each_round() {
    let mut gas = attack("Poison Gas", 0, 0.0, 0.0);
    gas.inflicts = Some(Status::Poison);
    let s = species(50, vec![gas]);
    let mut session = BattleSession::new(&s, 50);
    let mut p = Player::default();
    let mut dice = Dice::from_scripted(vec![0.5]);
    let clear = sky(Weather::Clear);

    let mut log = Vec::new();
    session.enemy_phase(&mut p, &clear, &mut dice, |m| log.push(m));
    assert!(p.poisoned);
    assert_eq!(p.hp(), 120);
    assert!(log.iter().any(|l| l.contains("is poisoned")));

    session.enemy_phase(&mut p, &clear, &mut dice, |_| {});
    assert_eq!(p.hp(), 115);
    session.enemy_phase(&mut p, &clear, &mut dice, |_| {});
    assert_eq!(p.hp(), 110);
    assert_eq!(session.rounds(), 3);
}

#[test]
fn missed_status_attack_does_not_poison() {
    let mut gas = attack("Poison Gas", 0, 1.0, 0.0);
    gas.inflicts = Some(Status::Poison);
    let s = species(50, vec![gas]);
    let mut session = BattleSession::new(&s, 50);
    let mut p = Player::default();
    let mut dice = Dice::from_scripted(vec![0.5]);
    session.enemy_phase(&mut p, &sky(Weather::Clear), &mut dice, |_| {});
    assert!(!p.poisoned);
}

#[test]
fn poison_tick_can_end_the_battle() {
    let s = species(50, vec![attack("Whiff", 10, 1.0, 0.0)]);
    let mut session = BattleSession::new(&s, 50);
    let mut p = Player::default();
    p.poisoned = true;
    p.health.hp = 5;
    let mut dice = Dice::from_scripted(vec![0.5]);
    let done = session.enemy_phase(&mut p, &sky(Weather::Clear), &mut dice, |_| {});
    assert_eq!(done, Some(BattleOutcome::Lost));
    assert_eq!(p.hp(), 0);
}

#[test]
fn ember_builds_a_combo() {
    let s = species(50, vec![]);
    let mut session = BattleSession::new(&s, 50);
    let mut p = Player::default();
    let mut dice = Dice::from_scripted(vec![0.5]);
    let clear = sky(Weather::Clear);
    for expected in [40, 30, 18] {
        session.player_phase(BattleAction::BasicAttack, &mut p, &clear, &mut dice, |_| {});
        assert_eq!(session.enemy_hp(), expected);
    }
    assert_eq!(p.stats.hit_streak, 3);
    assert_eq!(p.stats.best_streak, 3);
    assert_eq!(p.stats.damage_dealt, 32);
}

#[test]
fn combo_bonus_is_capped() {
    assert_eq!(combo_bonus(0), 0);
    assert_eq!(combo_bonus(1), 0);
    assert_eq!(combo_bonus(3), 4);
    assert_eq!(combo_bonus(5), 8);
    assert_eq!(combo_bonus(40), 8);
}

#[test]
fn fire_base_adds_level_weather_and_combo() {
    let mut p = Player::default();
    p.progress.level = 3;
    p.stats.hit_streak = 2;
    assert_eq!(fire_base(10, &p, Weather::Sunny), (16, 2));
    assert_eq!(fire_base(10, &p, Weather::Rain), (12, 2));
    assert_eq!(fire_base(12, &p, Weather::Fog), (16, 2));
}

#[test]
fn fog_adds_a_point_of_ember_miss() {
    let s = species(50, vec![]);
    let mut p = Player::default();
    let mut dice = Dice::from_scripted(vec![0.055]);

    let mut session = BattleSession::new(&s, 50);
    session.player_phase(BattleAction::BasicAttack, &mut p, &sky(Weather::Fog), &mut dice, |_| {});
    assert_eq!(session.enemy_hp(), 50);

    let mut session = BattleSession::new(&s, 50);
    let clear = sky(Weather::Clear);
    session.player_phase(BattleAction::BasicAttack, &mut p, &clear, &mut dice, |_| {});
    assert_eq!(session.enemy_hp(), 35);
}

#[test]
fn flamethrower_miss_odds_by_weather() {
    let s = species(50, vec![]);
    let mut dice = Dice::from_scripted(vec![0.09]);

    let mut p = Player::default();
    let mut session = BattleSession::new(&s, 50);
    let fog = sky(Weather::Fog);
    session.player_phase(BattleAction::ChargedAttack, &mut p, &fog, &mut dice, |_| {});
    assert_eq!(session.enemy_hp(), 50);
    assert_eq!(p.charges, 2);

    let mut p = Player::default();
    let mut session = BattleSession::new(&s, 50);
    let clear = sky(Weather::Clear);
    session.player_phase(BattleAction::ChargedAttack, &mut p, &clear, &mut dice, |_| {});
    assert_eq!(session.enemy_hp(), 32);
}

#[test]
fn charged_attack_without_pp_forfeits() {
    let s = species(50, vec![]);
    let mut session = BattleSession::new(&s, 50);
    let mut p = Player::default();
    p.charges = 0;
    p.stats.hit_streak = 3;
    let mut dice = Dice::from_scripted(vec![0.5]);
    let mut log = Vec::new();
    let clear = sky(Weather::Clear);
    let done = session.player_phase(BattleAction::ChargedAttack, &mut p, &clear, &mut dice, |m| {
        log.push(m)
    });
    assert_eq!(done, None);
    assert_eq!(session.enemy_hp(), 50);
    assert_eq!(p.stats.hit_streak, 0);
    assert!(log.iter().any(|l| l.contains("no PP")));
}

#[test]
fn run_is_a_coin_flip() {
    let s = species(50, vec![]);
    let clear = sky(Weather::Clear);
    let mut p = Player::default();

    let mut session = BattleSession::new(&s, 50);
    let mut dice = Dice::from_scripted(vec![0.7]);
    assert_eq!(session.player_phase(BattleAction::Run, &mut p, &clear, &mut dice, |_| {}), None);

    let mut dice = Dice::from_scripted(vec![0.2]);
    assert_eq!(
        session.player_phase(BattleAction::Run, &mut p, &clear, &mut dice, |_| {}),
        Some(BattleOutcome::Escaped)
    );
    assert_eq!(session.outcome(), Some(BattleOutcome::Escaped));
}

#[test]
fn items_in_battle() {
    let s = species(50, vec![]);
    let clear = sky(Weather::Clear);
    let mut dice = Dice::from_scripted(vec![0.5]);
    let mut session = BattleSession::new(&s, 50);
    let mut p = Player::default();
    p.health.hp = 60;
    p.inventory.potions = 1;
    p.inventory.super_potions = 1;
    p.inventory.antidotes = 1;

    session.player_phase(BattleAction::UsePotion, &mut p, &clear, &mut dice, |_| {});
    assert_eq!(p.hp(), 85);
    session.player_phase(BattleAction::UseSuperPotion, &mut p, &clear, &mut dice, |_| {});
    assert_eq!(p.hp(), 120);

    // not poisoned: the antidote stays in the bag
    session.player_phase(BattleAction::UseAntidote, &mut p, &clear, &mut dice, |_| {});
    assert_eq!(p.inventory.antidotes, 1);
    p.poisoned = true;
    session.player_phase(BattleAction::UseAntidote, &mut p, &clear, &mut dice, |_| {});
    assert!(!p.poisoned);
    assert_eq!(p.inventory.antidotes, 0);

    let mut log = Vec::new();
    session.player_phase(BattleAction::UsePotion, &mut p, &clear, &mut dice, |m| log.push(m));
    assert!(log.iter().any(|l| l.contains("turn lost")));
    let used = (p.stats.potions_used, p.stats.super_potions_used, p.stats.antidotes_used);
    assert_eq!(used, (1, 1, 1));
    assert_eq!(session.enemy_hp(), 50);
}

#[test]
fn antidote_cures_then_the_fight_is_won() {
    let mut gas = attack("Poison Gas", 0, 0.0, 0.0);
    gas.inflicts = Some(Status::Poison);
    let s = species(10, vec![gas]);
    let mut p = Player::default();
    p.inventory.antidotes = 1;
    let mut source = ScriptedActions::new(vec![
        BattleAction::DoNothing,
        BattleAction::UseAntidote,
        BattleAction::BasicAttack,
    ]);
    let mut dice = Dice::from_scripted(vec![0.5]);
    let mut log = Vec::new();
    let clear = sky(Weather::Clear);
    let outcome =
        BattleSession::new(&s, 10).run(&mut p, &clear, &mut dice, &mut source, |m| log.push(m));

    assert_eq!(outcome, BattleOutcome::Won);
    // round 1 poisons, round 2 ticks once before the cure, round 3 poisons again
    assert_eq!(p.hp(), 115);
    assert!(p.poisoned);
    assert_eq!(p.inventory.antidotes, 0);
    assert_eq!(p.stats.enemies_defeated, 1);
    assert_eq!(p.stats.hit_streak, 0);
    assert_eq!(p.stats.best_streak, 1);
    assert_eq!(p.score, 20);
    assert_eq!(p.progress.xp, 38);
    assert!(log.first().is_some_and(|l| l.starts_with("[BATTLE]")));
    assert!(log.iter().any(|l| l == "[END] Dummy defeated in 3 rounds"));
}

#[test]
fn a_battle_can_be_lost() {
    let s = species(500, vec![attack("Crush", 200, 0.0, 0.0)]);
    let mut p = Player::default();
    let mut source = ScriptedActions::new(vec![BattleAction::BasicAttack]);
    let mut dice = Dice::from_scripted(vec![0.5]);
    let clear = sky(Weather::Clear);
    let outcome = BattleSession::new(&s, 500).run(&mut p, &clear, &mut dice, &mut source, |_| {});
    assert_eq!(outcome, BattleOutcome::Lost);
    assert_eq!(p.hp(), 0);
    assert_eq!(p.score, 0);
}

#[test]
fn spoils_roll_heal_potion_then_xp() {
    let mut p = Player::default();
    p.health.hp = 50;
    let mut dice = Dice::from_scripted(vec![0.1, 0.1, 0.0]);
    let spoils = grant_spoils(&mut p, &mut dice, |_| {});
    assert_eq!(spoils.healed, 10);
    assert!(spoils.potion);
    assert_eq!(spoils.xp, 30);
    assert!(!spoils.leveled);
    assert_eq!(p.inventory.potions, 1);
    assert_eq!(p.progress.xp, 30);
    assert_eq!(p.score, 20);

    let mut dice = Dice::from_scripted(vec![0.9, 0.9, 0.999]);
    let spoils = grant_spoils(&mut p, &mut dice, |_| {});
    assert_eq!((spoils.healed, spoils.potion, spoils.xp), (0, false, 45));
}

#[test]
fn seeded_enemy_rolls_reach_miss_and_hit() {
    let s = species(50, vec![attack("Slam", 10, 0.05, 0.10)]);
    let mut dice = Dice::from_seed(2025);
    let mut missed = false;
    let mut landed = false;
    for _ in 0..500 {
        let mut session = BattleSession::new(&s, 50);
        let mut p = Player::default();
        session.enemy_phase(&mut p, &sky(Weather::Clear), &mut dice, |_| {});
        match p.stats.damage_taken {
            0 => missed = true,
            d if d >= 10 => landed = true,
            _ => {}
        }
    }
    assert!(missed && landed);
}
