fn main() {
    tile_match_bit::run();
}
