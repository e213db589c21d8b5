use std::collections::HashSet;

use engine::grid::START;
use engine::{Dice, EngineError, Grid, MapObject, ObjectCounts, ObjectKind, Pos, Roster, World};
use proptest::prelude::*;

fn counts(enemies: u32, potions: u32, super_potions: u32, antidotes: u32) -> ObjectCounts {
    ObjectCounts { enemies, potions, super_potions, antidotes, ..ObjectCounts::empty() }
}

#[test]
fn populate_places_distinct_free_cells() {
    let roster = Roster::builtin().unwrap();
    let mut world = World::new(Grid::default_maze().unwrap());
    let mut dice = Dice::from_seed(42);
    world.populate(&mut dice, &roster, counts(5, 2, 1, 1), START).expect("fits");

    assert_eq!(world.objects.len(), 9);
    assert_eq!(world.enemy_count(), 5);
    let cells: HashSet<Pos> = world.objects.iter().map(|o| o.pos).collect();
    assert_eq!(cells.len(), 9);
    assert!(!cells.contains(&START));
    assert!(cells.iter().all(|&p| world.grid.is_walkable(p)));

    for obj in &world.objects {
        if let ObjectKind::Enemy { species, hp } = &obj.kind {
            let s = roster.require(species).unwrap();
            assert!(!s.boss);
            assert_eq!(*hp, s.hp);
        }
    }
    assert_eq!(world.count_of(|k| matches!(k, ObjectKind::SuperPotion { .. })), 1);
}

#[test]
fn populate_replaces_previous_objects() {
    let roster = Roster::builtin().unwrap();
    let mut world = World::new(Grid::default_maze().unwrap());
    let mut dice = Dice::from_seed(3);
    world.populate(&mut dice, &roster, ObjectCounts::default(), START).unwrap();
    world.populate(&mut dice, &roster, counts(1, 0, 0, 0), START).unwrap();
    assert_eq!(world.objects.len(), 1);
}

#[test]
fn over_capacity_places_nothing() {
    let roster = Roster::builtin().unwrap();
    let mut world = World::new(Grid::parse("   ").unwrap());
    let mut dice = Dice::from_seed(1);
    let err = world
        .populate(&mut dice, &roster, counts(3, 0, 0, 0), Pos::new(0, 0))
        .unwrap_err();
    assert!(matches!(err, EngineError::Capacity { requested: 3, available: 2 }));
    assert!(err.is_recoverable());
    assert!(world.objects.is_empty());
}

#[test]
fn enemies_need_a_wild_species() {
    let bosses_only = Roster::from_json(
        r#"[{"name":"Boss Onix","hp":180,"boss":true,"attacks":[]}]"#,
    )
    .unwrap();
    let mut world = World::new(Grid::default_maze().unwrap());
    let mut dice = Dice::from_seed(1);
    let err = world.populate(&mut dice, &bosses_only, counts(1, 0, 0, 0), START).unwrap_err();
    assert!(matches!(err, EngineError::EmptyRoster(_)));
}

#[test]
fn full_map_has_no_free_cell() {
    let mut world = World::new(Grid::parse("  ").unwrap());
    world.objects.push(MapObject { pos: Pos::new(1, 0), kind: ObjectKind::Mystery });
    let mut dice = Dice::from_seed(1);
    assert!(matches!(
        world.random_free_cell(&mut dice, Pos::new(0, 0)),
        Err(EngineError::NoFreeCell)
    ));
}

#[test]
fn shrinking_keeps_at_least_one_enemy() {
    let s = ObjectCounts::default().shrunk();
    assert_eq!(
        s,
        ObjectCounts {
            enemies: 5,
            potions: 3,
            super_potions: 1,
            antidotes: 1,
            coins: 7,
            mysteries: 3
        }
    );
    assert_eq!(counts(1, 0, 0, 0).shrunk().enemies, 1);
    assert_eq!(counts(12, 0, 0, 0).shrunk().enemies, 9);
}

#[test]
fn object_json_is_tagged() {
    let obj = MapObject { pos: Pos::new(2, 3), kind: ObjectKind::Coin { value: 5 } };
    let json = serde_json::to_value(&obj).unwrap();
    assert_eq!(json["type"], "coin");
    assert_eq!(json["value"], 5);
    assert_eq!(json["pos"]["x"], 2);
}

proptest! {
    #[test]
    fn free_cell_is_walkable_and_unoccupied(seed in any::<u64>()) {
        let roster = Roster::builtin().unwrap();
        let mut world = World::new(Grid::default_maze().unwrap());
        let mut dice = Dice::from_seed(seed);
        world.populate(&mut dice, &roster, ObjectCounts::default(), START).unwrap();
        let cell = world.random_free_cell(&mut dice, START).unwrap();
        prop_assert!(world.grid.is_walkable(cell));
        prop_assert_ne!(cell, START);
        prop_assert!(world.object_at(cell).is_none());
    }
}
