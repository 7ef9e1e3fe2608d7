mod tests {
    use figure_light::color::Rgb;
    use figure_light::pattern::{
        StoredPattern, load_pattern, load_pattern_ids, save_pattern, save_pattern_ids,
    };
    use figure_light::store::{
        BLOCK_SIZE, hard_reset, load, load_mqtt_config, load_wifi_config, save, save_mqtt_config,
        save_wifi_config,
    };
    use figure_light::{
        ConfigStore, LightMode, LightState, MemoryStore, MqttConfig, StoreError, StoreKey,
        WifiConfig,
    };

    #[test]
    fn test_block_ids() {
        assert_eq!(StoreKey::Wifi.block_id(), 0x1984_1984);
        assert_eq!(StoreKey::Mqtt.block_id(), 0x1984_1985);
        assert_eq!(StoreKey::LightState.block_id(), 0x1984_1986);
        assert_eq!(StoreKey::PatternIds.block_id(), 0xDEAD_BEEF);
        assert_eq!(StoreKey::Pattern(5).block_id(), 0xBEEF_0005);
    }

    #[test]
    fn test_memory_store_put_get_remove() {
        let store: MemoryStore = MemoryStore::new();
        let mut buf = [0u8; 8];
        assert_eq!(store.get(StoreKey::Wifi, &mut buf), None);

        store.put(StoreKey::Wifi, &[1, 2, 3]).unwrap();
        assert_eq!(store.get(StoreKey::Wifi, &mut buf), Some(3));
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(store.write_count(), 1);

        // Identical contents never reach the medium.
        store.put(StoreKey::Wifi, &[1, 2, 3]).unwrap();
        assert_eq!(store.write_count(), 1);
        store.put(StoreKey::Wifi, &[1, 2, 4]).unwrap();
        assert_eq!(store.write_count(), 2);

        let mut small = [0u8; 2];
        assert_eq!(store.get(StoreKey::Wifi, &mut small), None);

        store.remove(StoreKey::Wifi);
        assert!(!store.contains(StoreKey::Wifi));
        assert_eq!(store.get(StoreKey::Wifi, &mut buf), None);
    }

    #[test]
    fn test_memory_store_limits() {
        let store: MemoryStore<2> = MemoryStore::new();
        assert_eq!(
            store.put(StoreKey::Wifi, &[0; BLOCK_SIZE + 1]),
            Err(StoreError::TooLarge)
        );
        store.put(StoreKey::Wifi, &[1]).unwrap();
        store.put(StoreKey::Mqtt, &[2]).unwrap();
        assert_eq!(store.put(StoreKey::LightState, &[3]), Err(StoreError::Full));
        // Replacing an existing block still works when full.
        store.put(StoreKey::Mqtt, &[4]).unwrap();
    }

    #[test]
    fn test_wifi_and_mqtt_config_round_trip() {
        let store: MemoryStore = MemoryStore::new();
        let wifi = WifiConfig {
            ssid: "figure-net".try_into().unwrap(),
            password: "hunter22".try_into().unwrap(),
        };
        let mqtt = MqttConfig {
            broker_address: "192.168.1.10".try_into().unwrap(),
            port: 8883,
            username: "figure".try_into().unwrap(),
            password: "secret".try_into().unwrap(),
            topic: "home/figure".try_into().unwrap(),
        };
        save_wifi_config(&store, &wifi).unwrap();
        save_mqtt_config(&store, &mqtt).unwrap();

        assert_eq!(load_wifi_config(&store), Some(wifi));
        assert_eq!(load_mqtt_config(&store), Some(mqtt));
    }

    #[test]
    fn test_foreign_block_reads_as_absent() {
        let store: MemoryStore = MemoryStore::new();
        store.put(StoreKey::Wifi, &[0xFF; 16]).unwrap();
        assert_eq!(load_wifi_config(&store), None);

        // A light state block is not a wifi block.
        save(&store, StoreKey::Mqtt, &LightState::new(10)).unwrap();
        assert_eq!(load_mqtt_config(&store), None);
    }

    #[test]
    fn test_light_state_round_trip() {
        let store: MemoryStore = MemoryStore::new();
        let states = [
            LightMode::Off,
            LightMode::SolidEffect { brightness: 200 },
            LightMode::CustomColor {
                hue: 120.5,
                saturation: 33.3,
                brightness: 200,
            },
            LightMode::NamedAnimation(5),
            LightMode::StoredPattern(7),
        ];
        for mode in states {
            let state = LightState {
                mode,
                hue: 120.5,
                saturation: 33.3,
                brightness: 200,
                animation_id: if let LightMode::NamedAnimation(id) = mode { id } else { 0 },
                pattern_id: 7,
            };
            save(&store, StoreKey::LightState, &state).unwrap();
            assert_eq!(load::<LightState>(&store, StoreKey::LightState), Some(state));
        }
    }

    #[test]
    fn test_pattern_round_trip_and_pixel_count() {
        let store: MemoryStore = MemoryStore::new();
        let mut pattern = StoredPattern::<6>::blank("Heart");
        pattern.pixels[2] = Rgb { r: 1, g: 2, b: 3 };
        pattern.next_pattern_id = 4;
        pattern.transition_time = 600;
        save_pattern(&store, 3, &pattern).unwrap();

        assert_eq!(load_pattern::<6>(&store, 3), Some(pattern.clone()));
        // Saved for six pixels, unusable with five.
        assert_eq!(load_pattern::<5>(&store, 3), None);

        let writes = store.write_count();
        save_pattern(&store, 3, &pattern).unwrap();
        assert_eq!(store.write_count(), writes);
    }

    #[test]
    fn test_long_pattern_name_is_truncated() {
        let long = "x".repeat(100);
        let pattern = StoredPattern::<1>::blank(&long);
        assert_eq!(pattern.name.len(), 48);
    }

    #[test]
    fn test_pattern_id_list() {
        let store: MemoryStore = MemoryStore::new();
        assert_eq!(load_pattern_ids(&store), None);

        let ids = heapless::Vec::from_slice(&[0, 3, 9]).unwrap();
        save_pattern_ids(&store, &ids).unwrap();
        assert_eq!(load_pattern_ids(&store), Some(ids));
    }

    #[test]
    fn test_hard_reset() {
        let store: MemoryStore = MemoryStore::new();
        save_pattern(&store, 0, &StoredPattern::<4>::blank("A")).unwrap();
        save_pattern(&store, 1, &StoredPattern::<4>::blank("B")).unwrap();
        save_pattern_ids(&store, &heapless::Vec::from_slice(&[0, 1]).unwrap()).unwrap();
        save(&store, StoreKey::LightState, &LightState::new(90)).unwrap();
        save_wifi_config(
            &store,
            &WifiConfig {
                ssid: "old".try_into().unwrap(),
                password: "old".try_into().unwrap(),
            },
        )
        .unwrap();

        hard_reset(&store).unwrap();

        assert!(!store.contains(StoreKey::Pattern(0)));
        assert!(!store.contains(StoreKey::Pattern(1)));
        assert!(!store.contains(StoreKey::PatternIds));
        assert!(!store.contains(StoreKey::LightState));
        assert_eq!(load_wifi_config(&store), Some(WifiConfig::default()));
        let mqtt = load_mqtt_config(&store).unwrap();
        assert_eq!(mqtt.port, 1883);
        assert!(mqtt.broker_address.is_empty());
    }
}
