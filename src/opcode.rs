//! Static opcode registry (component D/E foundation): one row per BEAM
//! opcode, carrying arity, mnemonic, and control-flow metadata extracted
//! from the reference instruction set definitions.

/// Control-flow metadata for one opcode.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub arity: u8,
    pub terminal: bool,
    pub branch: bool,
    /// Operand indices (0-based) that carry a `Label` jump target.
    pub jumprefs: &'static [u8],
}

pub const OPCODE_TABLE: &[OpcodeInfo] = &[
    OpcodeInfo { opcode: 1, mnemonic: "label", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 2, mnemonic: "func_info", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 3, mnemonic: "int_code_end", arity: 0, terminal: true, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 4, mnemonic: "call", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 5, mnemonic: "call_last", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 6, mnemonic: "call_only", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 7, mnemonic: "call_ext", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 8, mnemonic: "call_ext_last", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 9, mnemonic: "bif0", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 10, mnemonic: "bif1", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 11, mnemonic: "bif2", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 12, mnemonic: "allocate", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 13, mnemonic: "allocate_heap", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 14, mnemonic: "allocate_zero", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 15, mnemonic: "allocate_heap_zero", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 16, mnemonic: "test_heap", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 17, mnemonic: "init", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 18, mnemonic: "deallocate", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 19, mnemonic: "return", arity: 0, terminal: true, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 20, mnemonic: "send", arity: 0, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 21, mnemonic: "remove_message", arity: 0, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 22, mnemonic: "timeout", arity: 0, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 23, mnemonic: "loop_rec", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 24, mnemonic: "loop_rec_end", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 25, mnemonic: "wait", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 26, mnemonic: "wait_timeout", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 27, mnemonic: "-m_plus", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 28, mnemonic: "-m_minus", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 29, mnemonic: "-m_times", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 30, mnemonic: "-m_div", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 31, mnemonic: "-int_div", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 32, mnemonic: "-int_rem", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 33, mnemonic: "-int_band", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 34, mnemonic: "-int_bor", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 35, mnemonic: "-int_bxor", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 36, mnemonic: "-int_bsl", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 37, mnemonic: "-int_bsr", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 38, mnemonic: "-int_bnot", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 39, mnemonic: "is_lt", arity: 3, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 40, mnemonic: "is_ge", arity: 3, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 41, mnemonic: "is_eq", arity: 3, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 42, mnemonic: "is_ne", arity: 3, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 43, mnemonic: "is_eq_exact", arity: 3, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 44, mnemonic: "is_ne_exact", arity: 3, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 45, mnemonic: "is_integer", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 46, mnemonic: "is_float", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 47, mnemonic: "is_number", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 48, mnemonic: "is_atom", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 49, mnemonic: "is_pid", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 50, mnemonic: "is_reference", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 51, mnemonic: "is_port", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 52, mnemonic: "is_nil", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 53, mnemonic: "is_binary", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 54, mnemonic: "-is_constant", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 55, mnemonic: "is_list", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 56, mnemonic: "is_nonempty_list", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 57, mnemonic: "is_tuple", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 58, mnemonic: "test_arity", arity: 3, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 59, mnemonic: "select_val", arity: 3, terminal: false, branch: false, jumprefs: &[2] },
    OpcodeInfo { opcode: 60, mnemonic: "select_tuple_arity", arity: 3, terminal: false, branch: false, jumprefs: &[2] }, // jumpref_op(2) is missing in the reference source; added by analogy with select_val
    OpcodeInfo { opcode: 61, mnemonic: "jump", arity: 1, terminal: false, branch: false, jumprefs: &[0] },
    OpcodeInfo { opcode: 62, mnemonic: "catch", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 63, mnemonic: "catch_end", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 64, mnemonic: "move", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 65, mnemonic: "get_list", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 66, mnemonic: "get_tuple_element", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 67, mnemonic: "set_tuple_element", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 68, mnemonic: "-put_string", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 69, mnemonic: "put_list", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 70, mnemonic: "put_tuple", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 71, mnemonic: "put", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 72, mnemonic: "badmatch", arity: 1, terminal: true, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 73, mnemonic: "if_end", arity: 0, terminal: true, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 74, mnemonic: "case_end", arity: 1, terminal: true, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 75, mnemonic: "call_fun", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 76, mnemonic: "-make_fun", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 77, mnemonic: "is_function", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 78, mnemonic: "call_ext_only", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 79, mnemonic: "-bs_start_match", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 80, mnemonic: "-bs_get_integer", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 81, mnemonic: "-bs_get_float", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 82, mnemonic: "-bs_get_binary", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 83, mnemonic: "-bs_skip_bits", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 84, mnemonic: "-bs_test_tail", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 85, mnemonic: "-bs_save", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 86, mnemonic: "-bs_restore", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 87, mnemonic: "-bs_init", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 88, mnemonic: "-bs_final", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 89, mnemonic: "bs_put_integer", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 90, mnemonic: "bs_put_binary", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 91, mnemonic: "bs_put_float", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 92, mnemonic: "bs_put_string", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 93, mnemonic: "-bs_need_buf", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 94, mnemonic: "fclearerror", arity: 0, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 95, mnemonic: "fcheckerror", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 96, mnemonic: "fmove", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 97, mnemonic: "fconv", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 98, mnemonic: "fadd", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 99, mnemonic: "fsub", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 100, mnemonic: "fmul", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 101, mnemonic: "fdiv", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 102, mnemonic: "fnegate", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 103, mnemonic: "make_fun2", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 104, mnemonic: "try", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 105, mnemonic: "try_end", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 106, mnemonic: "try_case", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 107, mnemonic: "try_case_end", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 108, mnemonic: "raise", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 109, mnemonic: "bs_init2", arity: 6, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 110, mnemonic: "-bs_bits_to_bytes", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 111, mnemonic: "bs_add", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 112, mnemonic: "apply", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 113, mnemonic: "apply_last", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 114, mnemonic: "is_boolean", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 115, mnemonic: "is_function2", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 116, mnemonic: "-bs_start_match2", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 117, mnemonic: "bs_get_integer2", arity: 7, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 118, mnemonic: "bs_get_float2", arity: 7, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 119, mnemonic: "bs_get_binary2", arity: 7, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 120, mnemonic: "bs_skip_bits2", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 121, mnemonic: "bs_test_tail2", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 122, mnemonic: "-bs_save2", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 123, mnemonic: "-bs_restore2", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 124, mnemonic: "gc_bif1", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 125, mnemonic: "gc_bif2", arity: 6, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 126, mnemonic: "-bs_final2", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 127, mnemonic: "-bs_bits_to_bytes2", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 128, mnemonic: "-put_literal", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 129, mnemonic: "is_bitstr", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 130, mnemonic: "-bs_context_to_binary", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 131, mnemonic: "bs_test_unit", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 132, mnemonic: "bs_match_string", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 133, mnemonic: "bs_init_writable", arity: 0, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 134, mnemonic: "bs_append", arity: 8, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 135, mnemonic: "bs_private_append", arity: 6, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 136, mnemonic: "trim", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 137, mnemonic: "bs_init_bits", arity: 6, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 138, mnemonic: "bs_get_utf8", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 139, mnemonic: "bs_skip_utf8", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 140, mnemonic: "bs_get_utf16", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 141, mnemonic: "bs_skip_utf16", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 142, mnemonic: "bs_get_utf32", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 143, mnemonic: "bs_skip_utf32", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 144, mnemonic: "bs_utf8_size", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 145, mnemonic: "bs_put_utf8", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 146, mnemonic: "bs_utf16_size", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 147, mnemonic: "bs_put_utf16", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 148, mnemonic: "bs_put_utf32", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 149, mnemonic: "on_load", arity: 0, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 150, mnemonic: "recv_mark", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 151, mnemonic: "recv_set", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 152, mnemonic: "gc_bif3", arity: 7, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 153, mnemonic: "line", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 154, mnemonic: "put_map_assoc", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 155, mnemonic: "put_map_exact", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 156, mnemonic: "is_map", arity: 2, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 157, mnemonic: "has_map_fields", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 158, mnemonic: "get_map_elements", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 159, mnemonic: "is_tagged_tuple", arity: 4, terminal: false, branch: true, jumprefs: &[0] },
    OpcodeInfo { opcode: 160, mnemonic: "build_stacktrace", arity: 0, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 161, mnemonic: "raw_raise", arity: 0, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 162, mnemonic: "get_hd", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 163, mnemonic: "get_tl", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 164, mnemonic: "put_tuple2", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 165, mnemonic: "bs_get_tail", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 166, mnemonic: "bs_start_match3", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 167, mnemonic: "bs_get_position", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 168, mnemonic: "bs_set_position", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 169, mnemonic: "swap", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 170, mnemonic: "bs_start_match4", arity: 4, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 171, mnemonic: "make_fun3", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 172, mnemonic: "init_yregs", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 173, mnemonic: "recv_marker_bind", arity: 2, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 174, mnemonic: "recv_marker_clear", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 175, mnemonic: "recv_marker_reserve", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 176, mnemonic: "recv_marker_user", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 177, mnemonic: "bs_create_bin", arity: 6, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 178, mnemonic: "call_fun2", arity: 3, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 179, mnemonic: "nif_start", arity: 0, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 180, mnemonic: "badrecord", arity: 1, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 181, mnemonic: "update_record", arity: 5, terminal: false, branch: false, jumprefs: &[] },
    OpcodeInfo { opcode: 182, mnemonic: "bs_match", arity: 3, terminal: false, branch: false, jumprefs: &[] },
];

/// Looks up opcode metadata. Opcodes run contiguously from 1 to the table's
/// length with no gaps, so this is a direct index, not a search.
pub fn lookup(opcode: u8) -> Option<&'static OpcodeInfo> {
    OPCODE_TABLE.get((opcode as usize).checked_sub(1)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_contiguous_from_one() {
        for (i, info) in OPCODE_TABLE.iter().enumerate() {
            assert_eq!(info.opcode as usize, i + 1);
        }
    }

    #[test]
    fn lookup_matches_table() {
        let info = lookup(4).unwrap();
        assert_eq!(info.mnemonic, "call");
        assert_eq!(info.arity, 2);
    }

    #[test]
    fn lookup_zero_is_none() {
        assert!(lookup(0).is_none());
    }

    #[test]
    fn terminal_opcodes() {
        for op in [3u8, 19, 72, 73, 74] {
            assert!(lookup(op).unwrap().terminal, "opcode {op} should be terminal");
        }
    }

    #[test]
    fn is_lt_is_branch_with_jumpref_at_zero() {
        let info = lookup(39).unwrap();
        assert!(info.branch);
        assert_eq!(info.jumprefs, &[0]);
    }

    #[test]
    fn select_val_jumpref_at_two() {
        let info = lookup(59).unwrap();
        assert_eq!(info.mnemonic, "select_val");
        assert_eq!(info.jumprefs, &[2]);
    }

    #[test]
    fn select_tuple_arity_jumpref_at_two() {
        let info = lookup(60).unwrap();
        assert_eq!(info.mnemonic, "select_tuple_arity");
        assert_eq!(info.jumprefs, &[2]);
    }

    #[test]
    fn jump_jumpref_at_zero() {
        let info = lookup(61).unwrap();
        assert_eq!(info.mnemonic, "jump");
        assert_eq!(info.jumprefs, &[0]);
    }

    #[test]
    fn deprecated_mnemonics_keep_dash_prefix() {
        assert_eq!(lookup(27).unwrap().mnemonic, "-m_plus");
        assert_eq!(lookup(79).unwrap().mnemonic, "-bs_start_match");
    }
}
