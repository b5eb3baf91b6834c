#![no_main]

use binary::ByteCursor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The first half of the input picks operations, the second half is read.
    let (ops, payload) = data.split_at(data.len() / 2);
    let mut cursor = ByteCursor::new(payload);

    for &op in ops.iter().take(1024) {
        let _ = match op % 12 {
            0 => cursor.read_u8().is_ok(),
            1 => cursor.read_bool().is_ok(),
            2 => cursor.read_u16().is_ok(),
            3 => cursor.read_i32_le().is_ok(),
            4 => cursor.read_u64().is_ok(),
            5 => cursor.read_f64().is_ok(),
            6 => cursor.read_triad().is_ok(),
            7 => cursor.read_var_u32().is_ok(),
            8 => cursor.read_var_i64().is_ok(),
            9 => cursor.read_string().is_ok(),
            10 => cursor.read_uuid().is_ok(),
            _ => cursor.read_block_position().is_ok(),
        };
        assert!(cursor.position() <= payload.len());
    }
});
